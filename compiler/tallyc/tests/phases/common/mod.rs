//! Shared helpers: run source text through the full driver with output
//! captured in a buffer.

use tally_diagnostic::Diagnostic;
use tally_eval::Interpreter;
use tallyc::{run_source, InterpreterConfig, PrintTarget};

/// Interpreter printing into a buffer, with a step limit so a broken loop
/// fails the test instead of hanging it.
pub fn interpreter() -> Interpreter {
    InterpreterConfig {
        print: PrintTarget::Buffer,
        max_steps: Some(100_000),
        ..InterpreterConfig::default()
    }
    .build_interpreter()
    .expect("built-in operations register")
}

/// Run `source` and return what it printed.
pub fn output(source: &str) -> String {
    let mut interp = interpreter();
    if let Err(diag) = run_source(&mut interp, source) {
        panic!("program failed:\n{diag}");
    }
    interp.output()
}

/// Run `source`, expecting failure; returns the diagnostic and what was
/// printed before it.
pub fn failure(source: &str) -> (Diagnostic, String) {
    let mut interp = interpreter();
    match run_source(&mut interp, source) {
        Ok(()) => panic!("program succeeded with output:\n{}", interp.output()),
        Err(diag) => (diag, interp.output()),
    }
}

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}
