//! Counting (`FOR … WHEN … DO`) and iterating (`FOREACH … IN … DO`) loops.
//!
//! A block loop pushes a [`LoopContext`] at its header; the matching `ENDFOR`
//! or `ENDFOREACH` re-checks or advances it and jumps back to the first body
//! statement. A header with inline statements and no terminator loops in
//! place.

use crate::control::{find_terminator, offset_between, BlockKind, ForeachOwnership, LoopContext};
use crate::errors::{
    missing_terminator, non_boolean_condition, type_mismatch, unexpected_terminator, EvalError,
};
use crate::{EvalResult, InputSpec, OperationContext, OperationDefinition, OperationExecutor, Value};

fn require_bool(value: &Value, expression: &str) -> Result<bool, EvalError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(non_boolean_condition(expression, other.type_name())),
    }
}

/// Evaluate a loop condition outside its header statement.
fn recheck(exec: &mut dyn OperationExecutor, condition: &str) -> Result<bool, EvalError> {
    let note = || format!("while re-checking the loop condition `{condition}`");
    let value = exec
        .eval(condition)
        .map_err(|err| err.without_span().with_note(note()))?;
    require_bool(&value, condition).map_err(|err| err.with_note(note()))
}

/// Evaluate the condition captured by a `FOR` header.
fn header_condition(
    ctx: &OperationContext<'_>,
    exec: &mut dyn OperationExecutor,
) -> Result<bool, EvalError> {
    let value = ctx.eval_capture(2, exec)?;
    require_bool(&value, ctx.capture(2)?).map_err(|err| ctx.relocate(2, err))
}

/// Remove then bind, so the loop variable may change type between passes.
fn shadow(exec: &mut dyn OperationExecutor, name: &str, value: Value) -> Result<(), EvalError> {
    exec.remove(name);
    exec.bind(name, value)
}

/// Bind the loop variables for one `FOREACH` pass.
fn bind_pass(
    exec: &mut dyn OperationExecutor,
    value_var: &str,
    key_var: Option<&str>,
    (key, item): (Value, Value),
) -> Result<(), EvalError> {
    shadow(exec, value_var, item)?;
    match key_var {
        Some(key_var) => shadow(exec, key_var, key),
        None => Ok(()),
    }
}

/// Which loop variables are new, checked before the first pass binds them.
fn ownership(
    exec: &dyn OperationExecutor,
    value_var: &str,
    key_var: Option<&str>,
) -> ForeachOwnership {
    ForeachOwnership {
        value: !exec.contains(value_var),
        key: key_var.is_some_and(|key_var| !exec.contains(key_var)),
    }
}

/// Remove the loop variables the loop created; pre-existing ones keep the
/// last pass's values.
fn forget(
    exec: &mut dyn OperationExecutor,
    value_var: &str,
    key_var: Option<&str>,
    owned: ForeachOwnership,
) {
    if owned.value {
        exec.remove(value_var);
    }
    if let (Some(key_var), true) = (key_var, owned.key) {
        exec.remove(key_var);
    }
}

pub struct ForOperation;

impl OperationDefinition for ForOperation {
    fn name(&self) -> &'static str {
        "for"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:FOR)\s+([a-zA-Z_]\w*)\s+(?i:WHEN)\s+(.+?)\s*(?:\b(?i:DO)\b|=>)\s*(.*)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
            InputSpec::CurrentLine,
            InputSpec::Lines,
            InputSpec::JumpOffset,
        ]
    }

    fn description(&self) -> &'static str {
        "repeat while the condition holds; the iterator starts at 0 if undefined"
    }

    fn example(&self) -> &'static str {
        "FOR n WHEN n << 20 DO n = n + 2"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let iterator = ctx.capture(1)?;
        let condition = ctx.capture(2)?;
        let inline = ctx.capture(3)?.trim();
        let line = ctx.current_line()?;

        // An inline loop never claims the ENDFOR of a loop it sits in.
        let end = find_terminator(ctx.lines()?, line, BlockKind::For)
            .filter(|&end| !exec.control().closes_active_loop(end));
        if end.is_none() && inline.is_empty() {
            return Err(missing_terminator("FOR", "ENDFOR"));
        }

        let owned = !exec.contains(iterator);
        if owned {
            exec.bind(iterator, Value::number(0.0))
                .map_err(|err| ctx.relocate(1, err))?;
        }

        let mut holds = header_condition(ctx, exec)?;
        match end {
            Some(end) if holds => {
                if !inline.is_empty() {
                    exec.execute_inline(inline)?;
                }
                exec.control().loops.push(LoopContext::Counting {
                    iterator: iterator.to_string(),
                    header: line,
                    end: Some(end),
                    owned,
                    condition: condition.to_string(),
                    inline: inline.to_string(),
                });
            }
            Some(end) => {
                ctx.set_jump(offset_between(line, end))?;
                if owned {
                    exec.remove(iterator);
                }
            }
            None => {
                while holds {
                    exec.execute_inline(inline)?;
                    holds = header_condition(ctx, exec)?;
                }
                if owned {
                    exec.remove(iterator);
                }
            }
        }
        Ok(Value::Null)
    }
}

pub struct EndForOperation;

impl OperationDefinition for EndForOperation {
    fn name(&self) -> &'static str {
        "endfor"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:ENDFOR)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::CurrentLine, InputSpec::JumpOffset]
    }

    fn description(&self) -> &'static str {
        "re-check the loop condition and repeat or exit"
    }

    fn example(&self) -> &'static str {
        "ENDFOR"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let Some(LoopContext::Counting {
            iterator,
            header,
            owned,
            condition,
            inline,
            ..
        }) = exec.control().loops.last().cloned()
        else {
            return Err(unexpected_terminator("ENDFOR"));
        };

        if recheck(exec, &condition)? {
            if !inline.is_empty() {
                exec.execute_inline(&inline)?;
            }
            ctx.set_jump(offset_between(ctx.current_line()?, header))?;
        } else {
            exec.control().loops.pop();
            if owned {
                exec.remove(&iterator);
            }
        }
        Ok(Value::Null)
    }
}

pub struct ForeachOperation;

impl OperationDefinition for ForeachOperation {
    fn name(&self) -> &'static str {
        "foreach"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:FOREACH)\s+([a-zA-Z_]\w*)(?:\s*,\s*([a-zA-Z_]\w*))?\s+(?i:IN)\s+(.+?)\s*(\b(?i:DO)\b|=>)\s*(.*)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
            InputSpec::Capture(5),
            InputSpec::CurrentLine,
            InputSpec::Lines,
            InputSpec::JumpOffset,
        ]
    }

    fn description(&self) -> &'static str {
        "run the body once per array element or map entry (legacy; prefer FOR)"
    }

    fn example(&self) -> &'static str {
        "FOREACH book, i IN lib->books DO print book"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let value_var = ctx.capture(1)?;
        let key_var = ctx.optional_capture(2)?;
        let body = ctx.capture(5)?.trim();
        let line = ctx.current_line()?;

        let source = ctx.eval_capture(3, exec)?;
        let items: Vec<(Value, Value)> = match &source {
            Value::Array(items) => items
                .borrow()
                .iter()
                .zip(0u32..)
                .map(|(item, i)| (Value::number(f64::from(i)), item.clone()))
                .collect(),
            Value::Map(map) => map
                .borrow()
                .iter()
                .map(|(key, item)| (Value::text(key), item.clone()))
                .collect(),
            other => {
                let err = type_mismatch("array or map", other.type_name());
                return Err(ctx.relocate(3, err));
            }
        };

        let end = find_terminator(ctx.lines()?, line, BlockKind::Foreach);
        let owned = ownership(exec, value_var, key_var);
        if !body.is_empty() {
            // The inline form runs its body once, with the first entry bound.
            if let Some(first) = items.into_iter().next() {
                bind_pass(exec, value_var, key_var, first)?;
                exec.execute_inline(body)?;
                forget(exec, value_var, key_var, owned);
            }
            if let Some(end) = end {
                ctx.set_jump(offset_between(line, end))?;
            }
            return Ok(Value::Null);
        }

        let end = end.ok_or_else(|| missing_terminator("FOREACH", "ENDFOREACH"))?;
        let Some(first) = items.first().cloned() else {
            ctx.set_jump(offset_between(line, end))?;
            return Ok(Value::Null);
        };
        bind_pass(exec, value_var, key_var, first)?;
        exec.control().loops.push(LoopContext::Iterating {
            value: value_var.to_string(),
            key: key_var.map(str::to_string),
            header: line,
            items,
            index: 0,
            owned,
        });
        Ok(Value::Null)
    }
}

pub struct EndForeachOperation;

impl OperationDefinition for EndForeachOperation {
    fn name(&self) -> &'static str {
        "endforeach"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:ENDFOREACH)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::CurrentLine, InputSpec::JumpOffset]
    }

    fn description(&self) -> &'static str {
        "advance a FOREACH loop or exit it"
    }

    fn example(&self) -> &'static str {
        "ENDFOREACH"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let (value_var, key_var, header, owned, next) = match exec.control().loops.last_mut() {
            Some(LoopContext::Iterating {
                value,
                key,
                header,
                items,
                index,
                owned,
            }) => {
                *index += 1;
                let next = items.get(*index).cloned();
                (value.clone(), key.clone(), *header, *owned, next)
            }
            _ => return Err(unexpected_terminator("ENDFOREACH")),
        };

        match next {
            Some(pair) => {
                bind_pass(exec, &value_var, key_var.as_deref(), pair)?;
                ctx.set_jump(offset_between(ctx.current_line()?, header))?;
            }
            None => {
                exec.control().loops.pop();
                forget(exec, &value_var, key_var.as_deref(), owned);
            }
        }
        Ok(Value::Null)
    }
}
