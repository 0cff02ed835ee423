//! The `check` command: report statements no operation accepts.

use tally_eval::segment;

use crate::config::InterpreterConfig;
use crate::driver::check_source;
use crate::middleware::MiddlewarePipeline;

use super::{build_interpreter, exit_with, read_file};

/// Check every statement of a program without running it.
///
/// Reports all unmatched statements at once rather than stopping at the
/// first.
pub fn check_file(path: &str, config: &InterpreterConfig) {
    let source = read_file(path);
    let interpreter = build_interpreter(config);

    let problems = check_source(&interpreter, &source);
    if !problems.is_empty() {
        exit_with(config, &problems);
    }

    let statements = segment(&MiddlewarePipeline::standard().process(&source)).len();
    println!("OK: {path} ({statements} statements)");
}
