//! Binary operator semantics.
//!
//! Operators are applied pairwise by the left-to-right evaluator; there is no
//! precedence here, only the meaning of one `left OP right` step.

use tally_ir::BinaryOp;

use super::Value;
use crate::errors::{division_by_zero, invalid_binary_op, EvalResult};

/// Apply `op` to two operands.
///
/// Arithmetic and ordering coerce both sides to numbers; `+` falls back to
/// text concatenation when either side is not numeric. `&`/`|` work on the
/// integral parts, `&&`/`||` on booleans.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add => match (left.as_number(), right.as_number()) {
            (Ok(a), Ok(b)) => Ok(Value::number(a + b)),
            _ => concat(left, right),
        },
        BinaryOp::Sub => numeric(op, left, right, |a, b| a - b),
        BinaryOp::Mul => numeric(op, left, right, |a, b| a * b),
        BinaryOp::Div | BinaryOp::Mod => {
            let (a, b) = numbers(op, left, right)?;
            if b == 0.0 {
                return Err(division_by_zero());
            }
            Ok(Value::number(if op == BinaryOp::Div { a / b } else { a % b }))
        }
        BinaryOp::Eq => Ok(Value::boolean(loose_equals(left, right))),
        BinaryOp::NotEq => Ok(Value::boolean(!loose_equals(left, right))),
        BinaryOp::Lt => compare(op, left, right, |a, b| a < b),
        BinaryOp::LtEq => compare(op, left, right, |a, b| a <= b),
        BinaryOp::Gt => compare(op, left, right, |a, b| a > b),
        BinaryOp::GtEq => compare(op, left, right, |a, b| a >= b),
        BinaryOp::And | BinaryOp::Or => {
            let a = left
                .as_bool()
                .map_err(|_| invalid_binary_op(left.type_name(), op))?;
            let b = right
                .as_bool()
                .map_err(|_| invalid_binary_op(right.type_name(), op))?;
            Ok(Value::boolean(if op == BinaryOp::And { a && b } else { a || b }))
        }
        BinaryOp::BitAnd | BinaryOp::BitOr => {
            let a = left
                .as_integer()
                .map_err(|_| invalid_binary_op(left.type_name(), op))?;
            let b = right
                .as_integer()
                .map_err(|_| invalid_binary_op(right.type_name(), op))?;
            let result = if op == BinaryOp::BitAnd { a & b } else { a | b };
            #[expect(
                clippy::cast_precision_loss,
                reason = "numbers are f64 throughout the language"
            )]
            let result = result as f64;
            Ok(Value::number(result))
        }
    }
}

/// Equality as used by `==`, `!=` and `is`.
///
/// Same-variant values compare structurally. A number and a text compare
/// numerically when the text parses; a boolean and a text compare by the
/// text's boolean reading. Everything else is unequal.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    if left.same_variant(right) {
        return left == right;
    }
    match (left, right) {
        (Value::Number(_), Value::Text(_)) | (Value::Text(_), Value::Number(_)) => {
            matches!((left.as_number(), right.as_number()), (Ok(a), Ok(b)) if a == b)
        }
        (Value::Boolean(_), Value::Text(_)) | (Value::Text(_), Value::Boolean(_)) => {
            matches!((left.as_bool(), right.as_bool()), (Ok(a), Ok(b)) if a == b)
        }
        _ => false,
    }
}

fn concat(left: &Value, right: &Value) -> EvalResult {
    for side in [left, right] {
        if !matches!(side, Value::Number(_) | Value::Text(_) | Value::Boolean(_)) {
            return Err(invalid_binary_op(side.type_name(), BinaryOp::Add));
        }
    }
    Ok(Value::text(left.as_text() + &right.as_text()))
}

fn numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), crate::EvalError> {
    let a = left
        .as_number()
        .map_err(|_| invalid_binary_op(left.type_name(), op))?;
    let b = right
        .as_number()
        .map_err(|_| invalid_binary_op(right.type_name(), op))?;
    Ok((a, b))
}

fn numeric(op: BinaryOp, left: &Value, right: &Value, f: fn(f64, f64) -> f64) -> EvalResult {
    let (a, b) = numbers(op, left, right)?;
    Ok(Value::number(f(a, b)))
}

fn compare(op: BinaryOp, left: &Value, right: &Value, f: fn(f64, f64) -> bool) -> EvalResult {
    let (a, b) = numbers(op, left, right)?;
    Ok(Value::boolean(f(a, b)))
}
