//! The `run` command: preprocess and execute a Tally program.

use crate::config::InterpreterConfig;
use crate::driver::run_source;

use super::{build_interpreter, exit_with, read_file};

/// Run a program file. Program output goes where `config.print` says; the
/// first error is reported on stderr and ends the process with status 1.
pub fn run_file(path: &str, config: &InterpreterConfig) {
    let source = read_file(path);
    let mut interpreter = build_interpreter(config);
    if let Err(diag) = run_source(&mut interpreter, &source) {
        exit_with(config, &[diag]);
    }
}
