//! Runtime error to diagnostic conversion.
//!
//! Every `EvalErrorKind` has its own code:
//!
//! - E1001–E1005: statement syntax and block structure
//! - E2001–E2002: input binding
//! - E6001: arithmetic
//! - E6010–E6013: type errors
//! - E6020–E6027: undefined names and bad access
//! - E6030–E6033: duplicate definitions
//! - E6040: step limit
//! - E6099: custom/uncategorized
//!
//! The message is prefixed with the error's category (`TypeError`,
//! `UndefinedError`, ...). Labels are byte ranges into the failing statement,
//! which is attached as the diagnostic's [`SourceLine`].

use tally_diagnostic::{
    duplicate_definition, no_matching_operation, unclosed_delimiter, Diagnostic, ErrorCode,
    SourceLine,
};
use tally_patterns::{EvalError, EvalErrorKind};

/// Convert an `EvalError` into a `Diagnostic`.
pub fn eval_error_to_diagnostic(err: &EvalError) -> Diagnostic {
    let code = error_code_for_kind(&err.kind);
    let mut diag = match &err.kind {
        EvalErrorKind::NoMatchingOperation { statement, matched } => {
            no_matching_operation(statement, *matched)
        }
        EvalErrorKind::UnmatchedBracket { delimiter } if matches!(*delimiter, '(' | '[' | '{') => {
            match err.span {
                Some(span) => unclosed_delimiter(span, *delimiter),
                None => Diagnostic::error(code).with_message(&err.message),
            }
        }
        EvalErrorKind::DuplicateVariable { name } => duplicate_definition(code, "variable", name),
        EvalErrorKind::DuplicateClass { name } => duplicate_definition(code, "class", name),
        EvalErrorKind::DuplicateLabel { name } => duplicate_definition(code, "label", name),
        EvalErrorKind::DuplicateField { class, field } => {
            duplicate_definition(code, "field", field).with_note(format!("in class `{class}`"))
        }
        _ => Diagnostic::error(code).with_message(&err.message),
    };
    diag.message = format!("{}: {}", err.category(), diag.message);

    if diag.labels.is_empty() {
        if let Some(span) = err.span {
            diag = diag.with_label(span, label_for_kind(&err.kind));
        }
    }

    if let (Some(line), Some(statement)) = (err.line, &err.statement) {
        diag = diag.with_source(SourceLine::new(line + 1, statement.as_str()));
    }

    for note in &err.notes {
        diag = diag.with_note(note);
    }

    if let Some(suggestion) = suggestion_for_kind(&err.kind) {
        diag = diag.with_suggestion(suggestion);
    }

    diag
}

/// Map an `EvalErrorKind` to its `ErrorCode`.
pub fn error_code_for_kind(kind: &EvalErrorKind) -> ErrorCode {
    match kind {
        // Syntax / structure
        EvalErrorKind::NoMatchingOperation { .. } => ErrorCode::E1001,
        EvalErrorKind::UnmatchedBracket { .. } => ErrorCode::E1002,
        EvalErrorKind::MissingTerminator { .. } => ErrorCode::E1003,
        EvalErrorKind::UnexpectedTerminator { .. } => ErrorCode::E1004,
        EvalErrorKind::MalformedLiteral { .. } | EvalErrorKind::MalformedExpression { .. } => {
            ErrorCode::E1005
        }

        // Binding
        EvalErrorKind::ConversionFailed { .. } => ErrorCode::E2001,
        EvalErrorKind::UnsupportedInput { .. } => ErrorCode::E2002,

        // Arithmetic
        EvalErrorKind::DivisionByZero => ErrorCode::E6001,

        // Type
        EvalErrorKind::TypeMismatch { .. } => ErrorCode::E6010,
        EvalErrorKind::InvalidBinaryOp { .. } => ErrorCode::E6011,
        EvalErrorKind::VariantChange { .. } => ErrorCode::E6012,
        EvalErrorKind::NonBooleanCondition { .. } => ErrorCode::E6013,

        // Access
        EvalErrorKind::UndefinedVariable { .. } => ErrorCode::E6020,
        EvalErrorKind::UndefinedClass { .. } => ErrorCode::E6021,
        EvalErrorKind::NoSuchMember { .. } => ErrorCode::E6022,
        EvalErrorKind::NoSuchMethod { .. } => ErrorCode::E6023,
        EvalErrorKind::UndefinedLabel { .. } => ErrorCode::E6024,
        EvalErrorKind::IndexOutOfRange { .. } => ErrorCode::E6025,
        EvalErrorKind::NotIndexable { .. } => ErrorCode::E6026,
        EvalErrorKind::NullReference { .. } => ErrorCode::E6027,

        // Duplicates
        EvalErrorKind::DuplicateVariable { .. } => ErrorCode::E6030,
        EvalErrorKind::DuplicateClass { .. } => ErrorCode::E6031,
        EvalErrorKind::DuplicateField { .. } => ErrorCode::E6032,
        EvalErrorKind::DuplicateLabel { .. } => ErrorCode::E6033,

        // Runtime
        EvalErrorKind::StepLimitExceeded { .. } => ErrorCode::E6040,
        EvalErrorKind::Custom { .. } => ErrorCode::E6099,
    }
}

/// Short text for the primary label.
fn label_for_kind(kind: &EvalErrorKind) -> &'static str {
    match kind {
        EvalErrorKind::NoMatchingOperation { .. } => "no operation matches this statement",
        EvalErrorKind::UnmatchedBracket { .. } => "unmatched bracket",
        EvalErrorKind::MissingTerminator { .. } => "block opened here",
        EvalErrorKind::UnexpectedTerminator { .. } => "no block to close",
        EvalErrorKind::MalformedLiteral { .. } => "malformed literal",
        EvalErrorKind::MalformedExpression { .. } => "cannot evaluate this",
        EvalErrorKind::ConversionFailed { .. } => "conversion failed",
        EvalErrorKind::UnsupportedInput { .. } => "unsupported input",
        EvalErrorKind::DivisionByZero => "division by zero here",
        EvalErrorKind::TypeMismatch { .. } => "type mismatch",
        EvalErrorKind::InvalidBinaryOp { .. } => "operator not supported",
        EvalErrorKind::VariantChange { .. } => "value of a different type",
        EvalErrorKind::NonBooleanCondition { .. } => "not a boolean",
        EvalErrorKind::UndefinedVariable { .. } => "not defined",
        EvalErrorKind::UndefinedClass { .. } => "class not registered",
        EvalErrorKind::NoSuchMember { .. } => "member not found",
        EvalErrorKind::NoSuchMethod { .. } => "method not found",
        EvalErrorKind::UndefinedLabel { .. } => "label not found",
        EvalErrorKind::IndexOutOfRange { .. } => "index out of range",
        EvalErrorKind::NotIndexable { .. } => "cannot be indexed",
        EvalErrorKind::NullReference { .. } => "value is null",
        EvalErrorKind::DuplicateVariable { .. }
        | EvalErrorKind::DuplicateClass { .. }
        | EvalErrorKind::DuplicateField { .. }
        | EvalErrorKind::DuplicateLabel { .. } => "defined again here",
        EvalErrorKind::StepLimitExceeded { .. } => "limit reached here",
        EvalErrorKind::Custom { .. } => "runtime error",
    }
}

/// Help text for errors with an obvious fix.
fn suggestion_for_kind(kind: &EvalErrorKind) -> Option<String> {
    match kind {
        EvalErrorKind::NoMatchingOperation { .. } => {
            Some("run `tally ops` to list the statement forms".to_string())
        }
        EvalErrorKind::MissingTerminator { terminator, .. } => {
            Some(format!("add `{terminator}` after the block"))
        }
        EvalErrorKind::DivisionByZero => Some("check the divisor before dividing".to_string()),
        EvalErrorKind::VariantChange { .. } => {
            Some("store the new value in a fresh variable".to_string())
        }
        EvalErrorKind::DuplicateVariable { name } => {
            Some(format!("assign with `{name} = ...` instead of `let`"))
        }
        EvalErrorKind::DuplicateField { .. } => {
            Some("mark the later definition with $overwrite$".to_string())
        }
        EvalErrorKind::StepLimitExceeded { .. } => {
            Some("raise the limit with --max-steps=N".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
