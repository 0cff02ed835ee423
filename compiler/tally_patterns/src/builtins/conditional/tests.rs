use pretty_assertions::assert_eq;

use crate::errors::{ErrorCategory, EvalErrorKind};
use crate::test_helpers::{program, run_line, MockExecutor};
use crate::Value;

fn if_else() -> Vec<String> {
    program(&["IF flag THEN", "a = 1", "ELSE", "a = 2", "ENDIF"])
}

#[test]
fn test_true_condition_falls_through() {
    let mut exec = MockExecutor::new().with_var("flag", Value::boolean(true));
    assert_eq!(run_line(&mut exec, &if_else(), 0).map(|(_, j)| j), Ok(0));
    assert_eq!(exec.control.conditions, vec![true]);
}

#[test]
fn test_false_condition_lands_on_else() {
    let mut exec = MockExecutor::new().with_var("flag", Value::boolean(false));
    // pc = 0 + 1 + 1 = 2, the ELSE line
    assert_eq!(run_line(&mut exec, &if_else(), 0).map(|(_, j)| j), Ok(1));
    assert_eq!(exec.control.conditions, vec![false]);
}

#[test]
fn test_else_after_true_skips_to_after_endif() {
    let mut exec = MockExecutor::new();
    exec.control.conditions.push(true);
    // pc = 2 + 1 + 2 = 5, past ENDIF
    assert_eq!(run_line(&mut exec, &if_else(), 2).map(|(_, j)| j), Ok(2));
    assert!(exec.control.conditions.is_empty());
}

#[test]
fn test_else_after_false_leaves_entry_for_endif() {
    let mut exec = MockExecutor::new();
    exec.control.conditions.push(false);
    assert_eq!(run_line(&mut exec, &if_else(), 2).map(|(_, j)| j), Ok(0));
    assert_eq!(run_line(&mut exec, &if_else(), 4).map(|(_, j)| j), Ok(0));
    assert!(exec.control.conditions.is_empty());
}

#[test]
fn test_false_without_else_lands_on_endif() {
    let lines = program(&["IF 1 == 2 THEN", "a = 1", "b = 2", "ENDIF"]);
    let mut exec =
        MockExecutor::new().with_results("1 == 2", vec![Value::boolean(false)]);
    assert_eq!(run_line(&mut exec, &lines, 0).map(|(_, j)| j), Ok(2));
}

#[test]
fn test_non_boolean_condition() {
    let mut exec = MockExecutor::new().with_var("flag", Value::number(1.0));
    let err = run_line(&mut exec, &if_else(), 0).err();
    assert_eq!(
        err.as_ref().map(|e| e.kind.clone()),
        Some(EvalErrorKind::NonBooleanCondition {
            expression: "flag".into(),
            got: "number".into()
        })
    );
    assert_eq!(err.and_then(|e| e.span), Some(tally_ir::Span::new(3, 7)));
}

#[test]
fn test_missing_endif() {
    let lines = program(&["IF flag THEN", "a = 1"]);
    let mut exec = MockExecutor::new().with_var("flag", Value::boolean(false));
    let err = run_line(&mut exec, &lines, 0).err();
    assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::Structural));
}

#[test]
fn test_else_without_if() {
    let mut exec = MockExecutor::new();
    let err = run_line(&mut exec, &if_else(), 2).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::UnexpectedTerminator {
            terminator: "ELSE".into()
        })
    );
}

#[test]
fn test_stray_endif_is_tolerated() {
    let mut exec = MockExecutor::new();
    assert_eq!(run_line(&mut exec, &if_else(), 4).map(|(_, j)| j), Ok(0));
}
