//! Command handlers for the `tally` CLI.
//!
//! Each submodule implements one command. Handlers print their own output
//! and exit the process with status 1 on failure; shared helpers live here.

use std::io::{IsTerminal, Stderr};

use tally_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use tally_diagnostic::{Diagnostic, ErrorCode};
use tally_eval::Interpreter;

use crate::config::InterpreterConfig;
use crate::input::read_source;

mod check;
mod debug;
mod explain;
mod ops;
mod run;

pub use check::check_file;
pub use debug::lex_file;
pub use explain::explain_error;
pub use ops::list_operations;
pub use run::run_file;

/// Read a program file, exiting with a message on failure.
fn read_file(path: &str) -> String {
    match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Diagnostic emitter on stderr.
fn stderr_emitter(config: &InterpreterConfig) -> TerminalEmitter<Stderr> {
    let is_tty = std::io::stderr().is_terminal();
    config.emitter(std::io::stderr(), is_tty)
}

/// Build the interpreter, exiting with an internal error if the operation
/// catalog is broken.
fn build_interpreter(config: &InterpreterConfig) -> Interpreter {
    match config.build_interpreter() {
        Ok(interpreter) => interpreter,
        Err(err) => {
            let diag = Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("cannot build the operation registry: {err}"));
            exit_with(config, &[diag]);
        }
    }
}

/// Emit `diagnostics` with a summary line and exit with status 1.
fn exit_with(config: &InterpreterConfig, diagnostics: &[Diagnostic]) -> ! {
    let mut emitter = stderr_emitter(config);
    emitter.emit_all(diagnostics);
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    emitter.emit_summary(errors, diagnostics.len() - errors);
    emitter.flush();
    std::process::exit(1);
}
