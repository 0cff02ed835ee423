use pretty_assertions::assert_eq;
use tally_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use tally_ir::Span;
use tally_patterns::{
    division_by_zero, duplicate_field, duplicate_variable, missing_terminator,
    no_matching_operation, step_limit_exceeded, undefined_variable, unmatched_bracket,
};

use super::*;

fn render(diag: &Diagnostic) -> String {
    let mut out = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
    emitter.emit(diag);
    drop(emitter);
    String::from_utf8_lossy(&out).into_owned()
}

#[test]
fn test_division_by_zero() {
    let err = division_by_zero()
        .with_span(Span::from_range(8..9))
        .at_statement(2, "print 1 / 0");
    let diag = eval_error_to_diagnostic(&err);

    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.message, "ArithmeticError: division by zero");
    assert_eq!(diag.primary_span(), Some(Span::from_range(8..9)));
    assert_eq!(diag.source, Some(SourceLine::new(3, "print 1 / 0")));
    assert_eq!(diag.suggestions, vec!["check the divisor before dividing"]);
}

#[test]
fn test_rendered_snippet_underlines_span() {
    let err = undefined_variable("ghost")
        .with_span(Span::from_range(6..11))
        .at_statement(0, "print ghost");
    let text = render(&eval_error_to_diagnostic(&err));

    assert!(text.starts_with("error[E6020]: UndefinedError: undefined variable: ghost\n"));
    assert!(text.contains("\n --> line 1\n"));
    assert!(text.contains("1 | print ghost\n"));
    assert!(text.contains("  |       ^^^^^ not defined\n"));
}

#[test]
fn test_partial_match_labels() {
    let err = no_matching_operation("let x = 1 junk", 9).at_statement(0, "let x = 1 junk");
    let diag = eval_error_to_diagnostic(&err);

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "SyntaxError: let x = 1 Invalid token \" junk\"");
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::from_range(9..14)));
    assert!(diag.suggestions[0].contains("tally ops"));
}

#[test]
fn test_unclosed_bracket() {
    let err = unmatched_bracket('(')
        .with_span(Span::from_range(6..7))
        .at_statement(0, "print (1 + 2");
    let diag = eval_error_to_diagnostic(&err);

    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.message, "StructuralError: unclosed delimiter `(`");
    assert_eq!(diag.labels[0].message, "expected a matching `)`");
}

#[test]
fn test_stray_close_bracket_keeps_message() {
    let err = unmatched_bracket(')').with_span(Span::from_range(7..8));
    let diag = eval_error_to_diagnostic(&err);

    assert_eq!(diag.message, "StructuralError: unmatched bracket `)`");
    assert_eq!(diag.labels[0].message, "unmatched bracket");
    assert_eq!(diag.source, None);
}

#[test]
fn test_duplicate_field() {
    let err = duplicate_field("Book", "Title")
        .with_note("while defining class `Book`")
        .at_statement(0, "class Book:");
    let diag = eval_error_to_diagnostic(&err);

    assert_eq!(diag.code, ErrorCode::E6032);
    assert_eq!(
        diag.message,
        "DuplicateError: field `Title` is already defined"
    );
    assert_eq!(
        diag.notes,
        vec!["in class `Book`", "while defining class `Book`"]
    );
    assert_eq!(
        diag.suggestions,
        vec!["mark the later definition with $overwrite$"]
    );
}

#[test]
fn test_duplicate_variable_suggests_assignment() {
    let diag = eval_error_to_diagnostic(&duplicate_variable("n"));
    assert_eq!(diag.code, ErrorCode::E6030);
    assert_eq!(diag.suggestions, vec!["assign with `n = ...` instead of `let`"]);
}

#[test]
fn test_missing_terminator() {
    let diag = eval_error_to_diagnostic(&missing_terminator("FOR i WHEN i < 3 DO", "ENDFOR"));
    assert_eq!(diag.code, ErrorCode::E1003);
    assert!(diag.message.starts_with("StructuralError: "));
    assert_eq!(diag.suggestions, vec!["add `ENDFOR` after the block"]);
}

#[test]
fn test_runtime_category_codes() {
    let step = eval_error_to_diagnostic(&step_limit_exceeded(10));
    assert_eq!(step.code, ErrorCode::E6040);
    assert_eq!(
        step.message,
        "RuntimeError: step limit of 10 statements exceeded"
    );

    let custom = eval_error_to_diagnostic(&EvalError::new("boom"));
    assert_eq!(custom.code, ErrorCode::E6099);
    assert!(custom.suggestions.is_empty());
}

#[test]
fn test_codes_are_eval_or_syntax_ranges() {
    let errors = [
        division_by_zero(),
        undefined_variable("x"),
        unmatched_bracket('['),
        duplicate_variable("x"),
        missing_terminator("IF x THEN", "ENDIF"),
    ];
    for err in &errors {
        let code = error_code_for_kind(&err.kind);
        assert!(
            code.is_eval_error() || code.is_syntax_error(),
            "{code} for {err}"
        );
    }
}
