//! `IF cond THEN` … `ELSE` … `ENDIF`.
//!
//! Each `IF` pushes its result on the condition stack and exactly one later
//! statement pops it: `ELSE` after a true branch (which then skips to past
//! `ENDIF`), or `ENDIF` otherwise.

use tracing::warn;

use crate::control::{find_terminator, offset_between, BlockKind};
use crate::errors::{missing_terminator, non_boolean_condition, unexpected_terminator};
use crate::{EvalResult, InputSpec, OperationContext, OperationDefinition, OperationExecutor, Value};

pub struct IfOperation;

impl OperationDefinition for IfOperation {
    fn name(&self) -> &'static str {
        "if"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:IF)\s+(.+?)\s*(?i:THEN)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::CurrentLine,
            InputSpec::Lines,
            InputSpec::JumpOffset,
        ]
    }

    fn description(&self) -> &'static str {
        "run the following block only when the condition is true"
    }

    fn example(&self) -> &'static str {
        "IF n >= 10 THEN"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let condition = ctx.eval_capture(1, exec)?;
        let Value::Boolean(holds) = condition else {
            let err = non_boolean_condition(ctx.capture(1)?, condition.type_name());
            return Err(ctx.relocate(1, err));
        };

        if !holds {
            let line = ctx.current_line()?;
            let target = find_terminator(ctx.lines()?, line, BlockKind::Branch)
                .ok_or_else(|| missing_terminator("IF", "ENDIF"))?;
            // Land on the ELSE/ENDIF itself so it can balance the stack.
            ctx.set_jump(offset_between(line, target) - 1)?;
        }
        exec.control().conditions.push(holds);
        Ok(Value::boolean(holds))
    }
}

pub struct ElseOperation;

impl OperationDefinition for ElseOperation {
    fn name(&self) -> &'static str {
        "else"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:ELSE)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::CurrentLine,
            InputSpec::Lines,
            InputSpec::JumpOffset,
        ]
    }

    fn description(&self) -> &'static str {
        "start the branch taken when the IF condition was false"
    }

    fn example(&self) -> &'static str {
        "ELSE"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        match exec.control().conditions.last().copied() {
            None => Err(unexpected_terminator("ELSE")),
            Some(false) => Ok(Value::Null),
            Some(true) => {
                exec.control().conditions.pop();
                let line = ctx.current_line()?;
                let endif = find_terminator(ctx.lines()?, line, BlockKind::EndIf)
                    .ok_or_else(|| missing_terminator("ELSE", "ENDIF"))?;
                ctx.set_jump(offset_between(line, endif))?;
                Ok(Value::Null)
            }
        }
    }
}

pub struct EndIfOperation;

impl OperationDefinition for EndIfOperation {
    fn name(&self) -> &'static str {
        "endif"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:ENDIF)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[]
    }

    fn description(&self) -> &'static str {
        "close an IF block"
    }

    fn example(&self) -> &'static str {
        "ENDIF"
    }

    fn invoke(&self, _ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        if exec.control().conditions.pop().is_none() {
            warn!("ENDIF without an open IF");
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests;
