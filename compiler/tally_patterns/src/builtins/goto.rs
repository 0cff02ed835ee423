//! Labels and `goto`.

use crate::control::offset_between;
use crate::errors::{duplicate_label, undefined_label};
use crate::{EvalResult, InputSpec, OperationContext, OperationDefinition, OperationExecutor, Value};

/// Label name declared by a `name:` statement.
fn label_name(statement: &str) -> Option<&str> {
    let name = statement.trim().strip_suffix(':')?.trim_end();
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(name)
}

/// `name:`: a jump target. Fails if the same label appears anywhere else.
pub struct LabelOperation;

impl OperationDefinition for LabelOperation {
    fn name(&self) -> &'static str {
        "label"
    }

    fn pattern(&self) -> &'static str {
        r"^([A-Za-z_]\w*)\s*:$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::CurrentLine,
            InputSpec::Lines,
        ]
    }

    fn description(&self) -> &'static str {
        "mark a goto target"
    }

    fn example(&self) -> &'static str {
        "retry:"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, _exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let line = ctx.current_line()?;
        let duplicated = ctx
            .lines()?
            .iter()
            .enumerate()
            .any(|(i, other)| i != line && label_name(other) == Some(name));
        if duplicated {
            return Err(ctx.relocate(1, duplicate_label(name)));
        }
        Ok(Value::Null)
    }
}

/// `goto name`: continue after the statement `name:`.
pub struct GotoOperation;

impl OperationDefinition for GotoOperation {
    fn name(&self) -> &'static str {
        "goto"
    }

    fn pattern(&self) -> &'static str {
        r"(?i)^goto\s+([A-Za-z_]\w*)$"
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
        "jump to the statement after a label"
    }

    fn example(&self) -> &'static str {
        "goto retry"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let line = ctx.current_line()?;
        let target = ctx
            .lines()?
            .iter()
            .position(|other| label_name(other) == Some(name))
            .ok_or_else(|| ctx.relocate(1, undefined_label(name)))?;
        exec.control().leave_blocks(ctx.lines()?, line, target);
        ctx.set_jump(offset_between(line, target))?;
        Ok(Value::Null)
    }
}
