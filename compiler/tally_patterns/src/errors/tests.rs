use pretty_assertions::assert_eq;
use tally_ir::{BinaryOp, Span};

use super::*;

#[test]
fn test_factory_sets_kind_and_message() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.category(), ErrorCategory::Arithmetic);
}

#[test]
fn test_new_is_custom() {
    let err = EvalError::new("boom");
    assert_eq!(
        err.kind,
        EvalErrorKind::Custom {
            message: "boom".into()
        }
    );
    assert_eq!(err.category(), ErrorCategory::Runtime);
}

#[test]
fn test_partial_match_message() {
    let err = no_matching_operation("ADD 1 2 3", 7);
    assert_eq!(err.message, "ADD 1 2 Invalid token \" 3\"");
    assert_eq!(err.category(), ErrorCategory::Syntax);
}

#[test]
fn test_whole_statement_invalid_message() {
    assert_eq!(
        no_matching_operation("frobnicate", 0).message,
        "Invalid token: \"frobnicate\""
    );
    assert_eq!(
        no_matching_operation("frobnicate", 10).message,
        "Invalid token: \"frobnicate\""
    );
}

#[test]
fn test_categories() {
    assert_eq!(undefined_label("L").category(), ErrorCategory::Undefined);
    assert_eq!(duplicate_label("L").category(), ErrorCategory::Duplicate);
    assert_eq!(
        conversion_failed("to_number", "x", "not a number").category(),
        ErrorCategory::Binding
    );
    assert_eq!(
        missing_terminator("IF", "ENDIF").category(),
        ErrorCategory::Structural
    );
    assert_eq!(index_out_of_range(3, 2).category(), ErrorCategory::Index);
    assert_eq!(
        invalid_binary_op("array", BinaryOp::Sub).category(),
        ErrorCategory::Type
    );
    assert_eq!(null_reference("x").category(), ErrorCategory::Undefined);
}

#[test]
fn test_invalid_binary_op_uses_symbol() {
    assert_eq!(
        invalid_binary_op("boolean", BinaryOp::Lt).message,
        "operator `<<` cannot be applied to boolean"
    );
}

#[test]
fn test_shifted_rebases_span() {
    let err = undefined_variable("x")
        .with_span(Span::new(2, 3))
        .shifted(10, Span::new(0, 1));
    assert_eq!(err.span, Some(Span::new(12, 13)));
}

#[test]
fn test_shifted_uses_fallback_without_span() {
    let err = undefined_variable("x").shifted(10, Span::new(10, 20));
    assert_eq!(err.span, Some(Span::new(10, 20)));
}

#[test]
fn test_at_statement_keeps_innermost() {
    let err = division_by_zero()
        .at_statement(3, "x = 1 / 0")
        .at_statement(1, "FOR i WHEN i << 3 DO x = 1 / 0");
    assert_eq!(err.line, Some(3));
    assert_eq!(err.statement.as_deref(), Some("x = 1 / 0"));
}

#[test]
fn test_with_span_if_absent() {
    let err = division_by_zero()
        .with_span(Span::new(1, 2))
        .with_span_if_absent(Span::new(5, 6));
    assert_eq!(err.span, Some(Span::new(1, 2)));
}

#[test]
fn test_category_display() {
    assert_eq!(ErrorCategory::Arithmetic.to_string(), "ArithmeticError");
    assert_eq!(ErrorCategory::Undefined.to_string(), "UndefinedError");
}
