//! Preprocess, run and report: the path every command shares.

use tally_diagnostic::Diagnostic;
use tally_eval::Interpreter;
use tracing::debug;

use crate::middleware::MiddlewarePipeline;
use crate::problem::eval_error_to_diagnostic;

/// Preprocess `source` and run it to completion.
///
/// The first failure stops the run and comes back as a diagnostic.
pub fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<(), Diagnostic> {
    let program = MiddlewarePipeline::standard().process(source);
    let result = interpreter.run(&program);
    debug!(steps = interpreter.steps(), ok = result.is_ok(), "run finished");
    result.map_err(|err| eval_error_to_diagnostic(&err))
}

/// Diagnostics for every statement no operation accepts. Nothing runs.
pub fn check_source(interpreter: &Interpreter, source: &str) -> Vec<Diagnostic> {
    let program = MiddlewarePipeline::standard().process(source);
    interpreter
        .check(&program)
        .iter()
        .map(eval_error_to_diagnostic)
        .collect()
}
