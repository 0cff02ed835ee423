//! Failures rendered the way `tally run` prints them.

use pretty_assertions::assert_eq;
use tally_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use tally_diagnostic::{Diagnostic, ErrorCode, SourceLine};
use tally_ir::Span;
use tallyc::check_source;

use crate::common::{failure, interpreter};

fn render(diag: &Diagnostic) -> String {
    let mut out = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
    emitter.emit(diag);
    emitter.emit_summary(1, 0);
    drop(emitter);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_undefined_variable_report() {
    let (diag, printed) = failure("let a = 1;\nprint a;\nprint a + ghost;");
    assert_eq!(printed, "1\n");
    assert_eq!(diag.code, ErrorCode::E6020);
    assert_eq!(diag.source, Some(SourceLine::new(3, "print a + ghost")));
    assert_eq!(diag.primary_span(), Some(Span::from_range(10..15)));

    assert_eq!(
        render(&diag),
        "\
error[E6020]: UndefinedError: undefined variable: ghost
 --> line 3
  |
3 | print a + ghost
  |           ^^^^^ not defined
  |

error: aborting due to previous error
"
    );
}

#[test]
fn test_partial_match_report() {
    let (diag, _) = failure("let x = 1;\nGOTO;");
    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.source.as_ref().map(|s| s.number), Some(2));
    assert!(render(&diag).contains("= help: run `tally ops` to list the statement forms"));
}

#[test]
fn test_unbalanced_bracket_points_at_opener() {
    let (diag, _) = failure("print (1 + 2;");
    assert_eq!(diag.code, ErrorCode::E1002);
    assert_eq!(diag.primary_span(), Some(Span::from_range(6..7)));
    assert!(render(&diag).contains("  |       ^ expected a matching `)`\n"));
}

#[test]
fn test_missing_endfor() {
    let (diag, _) = failure("FOR i WHEN i < 3 DO;\nprint i;");
    assert_eq!(diag.code, ErrorCode::E1003);
    assert!(diag.message.starts_with("StructuralError: "));
}

#[test]
fn test_undefined_label() {
    let (diag, _) = failure("goto nowhere;");
    assert_eq!(diag.code, ErrorCode::E6024);
    assert!(diag.message.starts_with("UndefinedError: "));
}

#[test]
fn test_duplicate_label() {
    let (diag, _) = failure("top:\nprint 1;\ntop:\n");
    assert_eq!(diag.code, ErrorCode::E6033);
    assert!(diag.message.starts_with("DuplicateError: "));
}

#[test]
fn test_non_boolean_condition() {
    let (diag, _) = failure("IF 1 + 1 THEN\nprint 1;\nENDIF");
    assert_eq!(diag.code, ErrorCode::E6013);
    assert!(diag.message.starts_with("TypeError: "));
}

#[test]
fn test_check_reports_every_unknown_statement() {
    let interp = interpreter();
    let problems = check_source(&interp, "print 1;\nfrobnicate 2;\nlet x = 3;\nwibble;");
    let lines: Vec<Option<usize>> = problems
        .iter()
        .map(|d| d.source.as_ref().map(|s| s.number))
        .collect();
    assert_eq!(lines, vec![Some(2), Some(4)]);
    assert!(problems.iter().all(|d| d.code == ErrorCode::E1001));
    assert_eq!(interp.output(), "");
}
