//! The `explain` command: describe an error code.

use tally_diagnostic::ErrorCode;

/// Print the description of `code_str` (e.g. `E6001`).
pub fn explain_error(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E1001, E6001, E6020");
        std::process::exit(1);
    };

    let phase = if code.is_syntax_error() {
        "statement syntax"
    } else if code.is_binding_error() {
        "input binding"
    } else if code.is_eval_error() {
        "runtime"
    } else {
        "internal"
    };
    println!("{code} ({phase}): {}", code.description());
}
