use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tally_ir::Span;
use tally_patterns::{EvalErrorKind, MapValue};

use super::*;
use crate::environment::VariableStore;

fn store_with(vars: &[(&str, Value)]) -> VariableStore {
    let mut store = VariableStore::new();
    for (name, value) in vars {
        store.bind(name, value.clone()).unwrap_or_default();
    }
    store
}

fn eval(source: &str) -> EvalResult {
    evaluate(source, &mut VariableStore::new())
}

fn error(source: &str) -> Option<(EvalErrorKind, Option<Span>)> {
    eval(source).err().map(|e| (e.kind, e.span))
}

// Left-to-right evaluation

#[test]
fn test_no_precedence() {
    assert_eq!(eval("2 + 2 * (22)"), Ok(Value::number(88.0)));
    assert_eq!(eval("10 - 2 - 3"), Ok(Value::number(5.0)));
    assert_eq!(eval("1 + 2 * 3"), Ok(Value::number(9.0)));
}

#[test]
fn test_brackets_group_first() {
    assert_eq!(eval("2 * (1 + 2)"), Ok(Value::number(6.0)));
    assert_eq!(eval("((4))"), Ok(Value::number(4.0)));
    assert_eq!(eval("(1 + (2 * 3)) - 1"), Ok(Value::number(6.0)));
}

#[test]
fn test_unary_minus() {
    assert_eq!(eval("-3 + 5"), Ok(Value::number(2.0)));
    assert_eq!(eval("2 * -(1 + 1)"), Ok(Value::number(-4.0)));
}

#[test]
fn test_text_and_comparisons() {
    assert_eq!(eval(r#""a" + 1"#), Ok(Value::text("a1")));
    assert_eq!(eval("3 << 5"), Ok(Value::boolean(true)));
    assert_eq!(eval("3 < 5 && (2 > 1)"), Ok(Value::boolean(true)));
    assert_eq!(eval(r#""7" is 7"#), Ok(Value::boolean(true)));
}

#[test]
fn test_identifiers_and_paths() {
    let mut pet = MapValue::new();
    pet.insert("age", Value::number(3.0));
    let mut store = store_with(&[("pet", Value::map(pet)), ("n", Value::number(2.0))]);
    assert_eq!(evaluate("pet->age * n", &mut store), Ok(Value::number(6.0)));
}

#[test]
fn test_container_literals() {
    let mut store = store_with(&[("x", Value::number(1.0))]);
    assert_eq!(
        evaluate("[x, 2]", &mut store),
        Ok(Value::array(vec![Value::number(1.0), Value::number(2.0)]))
    );
    let mut expected = MapValue::new();
    expected.insert("a", Value::number(1.0));
    assert_eq!(evaluate("{a: x}", &mut store), Ok(Value::map(expected)));
    assert_eq!(
        evaluate("[x]", &mut store),
        Ok(Value::array(vec![Value::number(1.0)]))
    );
}

// Conditional assignment

#[test]
fn test_conditional_assignment_when_true() {
    let mut store = store_with(&[("n", Value::number(5.0))]);
    assert_eq!(evaluate("n < 10 = 10", &mut store), Ok(Value::boolean(true)));
    assert_eq!(store.get("n"), Some(&Value::number(10.0)));
}

#[test]
fn test_conditional_assignment_skipped_when_false() {
    let mut store = store_with(&[("n", Value::number(50.0))]);
    assert_eq!(evaluate("n < 10 = 10", &mut store), Ok(Value::boolean(false)));
    assert_eq!(store.get("n"), Some(&Value::number(50.0)));
}

#[test]
fn test_conditional_assignment_keeps_variant() {
    let mut store = store_with(&[("n", Value::number(1.0))]);
    assert_eq!(evaluate(r#"n == 1 = "7""#, &mut store), Ok(Value::boolean(true)));
    assert_eq!(store.get("n"), Some(&Value::number(7.0)));
}

#[test]
fn test_conditional_assignment_needs_variable_on_left() {
    let mut store = store_with(&[("n", Value::number(1.0))]);
    assert_eq!(evaluate("1 == n = 9", &mut store), Ok(Value::boolean(true)));
    assert_eq!(store.get("n"), Some(&Value::number(1.0)));
}

// Errors

#[test]
fn test_unmatched_brackets() {
    assert_eq!(
        error("(1 + 2"),
        Some((
            EvalErrorKind::UnmatchedBracket { delimiter: '(' },
            Some(Span::new(0, 1))
        ))
    );
    assert_eq!(
        error("1 + 2)"),
        Some((
            EvalErrorKind::UnmatchedBracket { delimiter: ')' },
            Some(Span::new(5, 6))
        ))
    );
}

#[test]
fn test_division_by_zero_points_at_operator() {
    assert_eq!(
        error("4 / 0"),
        Some((EvalErrorKind::DivisionByZero, Some(Span::new(2, 3))))
    );
}

#[test]
fn test_undefined_variable_points_at_name() {
    assert_eq!(
        error("1 + ghost"),
        Some((
            EvalErrorKind::UndefinedVariable {
                name: "ghost".into()
            },
            Some(Span::new(4, 9))
        ))
    );
}

#[test]
fn test_malformed_sequences() {
    for source in ["1 +", "1 2", "", "()", "* 2"] {
        assert!(
            matches!(
                error(source),
                Some((EvalErrorKind::MalformedExpression { .. }, _))
            ),
            "{source:?}"
        );
    }
}

proptest! {
    #[test]
    fn prop_left_fold(
        first in 0u32..50,
        rest in proptest::collection::vec((0usize..3, 0u32..50), 0..8)
    ) {
        let mut source = first.to_string();
        let mut expected = f64::from(first);
        for (op, n) in &rest {
            let n_f = f64::from(*n);
            let (symbol, value) = match op {
                0 => ("+", expected + n_f),
                1 => ("-", expected - n_f),
                _ => ("*", expected * n_f),
            };
            source.push_str(&format!(" {symbol} {n}"));
            expected = value;
        }
        prop_assert_eq!(eval(&source), Ok(Value::number(expected)));
    }
}
