//! Class operations: the `class … class:end` block, `new` and `CALL`.

use crate::control::offset_between;
use crate::errors::{malformed_expression, missing_terminator, unexpected_terminator};
use crate::value::split_top_level;
use crate::{
    EvalResult, InputSpec, MatchScope, OperationContext, OperationDefinition, OperationExecutor,
    Value,
};

/// Terminator line of a class block.
const CLASS_END: &str = "class:end";

/// `class Name:` … `class:end`: define a class from its body lines.
///
/// Matched against the rest of the program so the whole body is captured
/// at once; execution then jumps past `class:end`.
pub struct ClassBlockOperation;

impl OperationDefinition for ClassBlockOperation {
    fn name(&self) -> &'static str {
        "class"
    }

    fn pattern(&self) -> &'static str {
        r"^class\s+(\w+)\s*:\n((?:.*\n)*?)(?i:class:end)(?:\n|$)"
    }

    fn scope(&self) -> MatchScope {
        MatchScope::WholeProgram
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::CurrentLine,
            InputSpec::Lines,
            InputSpec::JumpOffset,
        ]
    }

    fn description(&self) -> &'static str {
        "define a class from `field: value [as type] [$overwrite$]` lines"
    }

    fn example(&self) -> &'static str {
        "class Pet: age: 3 as int; name: \"Rex\"; class:end"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let body = ctx.capture(2)?;
        let line = ctx.current_line()?;
        let lines = ctx.lines()?;

        let end = line + 1 + body.matches('\n').count();
        let terminated = lines
            .get(end)
            .is_some_and(|text| text.trim().eq_ignore_ascii_case(CLASS_END));
        if !terminated {
            return Err(missing_terminator(&format!("class {name}"), CLASS_END));
        }

        let fields: Vec<&str> = body
            .lines()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect();
        exec.define_class(name, &fields)
            .map_err(|err| ctx.relocate(1, err))?;
        ctx.set_jump(offset_between(line, end))?;
        Ok(Value::Null)
    }
}

/// `class Name:` with no `class:end` anywhere after it.
pub struct UnterminatedClassOperation;

impl OperationDefinition for UnterminatedClassOperation {
    fn name(&self) -> &'static str {
        "unterminated_class"
    }

    fn pattern(&self) -> &'static str {
        r"^class\s+(\w+)\s*:$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::Capture(1)]
    }

    fn description(&self) -> &'static str {
        "report a class header whose block is never closed"
    }

    fn example(&self) -> &'static str {
        "class Pet:"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, _exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        Err(missing_terminator(&format!("class {name}"), CLASS_END))
    }
}

/// `class:end` reached without its header.
pub struct ClassEndOperation;

impl OperationDefinition for ClassEndOperation {
    fn name(&self) -> &'static str {
        "class_end"
    }

    fn pattern(&self) -> &'static str {
        r"^(?i:class:end)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[]
    }

    fn description(&self) -> &'static str {
        "report a `class:end` with no open class"
    }

    fn example(&self) -> &'static str {
        "class:end"
    }

    fn invoke(&self, _ctx: &mut OperationContext<'_>, _exec: &mut dyn OperationExecutor) -> EvalResult {
        Err(unexpected_terminator(CLASS_END))
    }
}

/// `new pet = Pet:new` / `let pet = Pet:new`: instantiate a class.
pub struct NewOperation;

impl OperationDefinition for NewOperation {
    fn name(&self) -> &'static str {
        "new"
    }

    fn pattern(&self) -> &'static str {
        r"^(?:new|let)\s+(\w+)\s*=\s*(\w+):new$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::Capture(1), InputSpec::Capture(2)]
    }

    fn description(&self) -> &'static str {
        "create an instance of a class"
    }

    fn example(&self) -> &'static str {
        "let pet = Pet:new"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let class = ctx.capture(2)?;
        let instance = exec
            .instantiate(class)
            .map_err(|err| ctx.relocate(2, err))?;
        let stored = if exec.contains(name) {
            exec.rebind(name, instance.clone())
        } else {
            exec.bind(name, instance.clone())
        };
        stored.map_err(|err| ctx.relocate(1, err))?;
        Ok(instance)
    }
}

/// `CALL target->method(args)`: invoke a method and print a non-null result.
pub struct CallOperation;

impl OperationDefinition for CallOperation {
    fn name(&self) -> &'static str {
        "call"
    }

    fn pattern(&self) -> &'static str {
        r"(?i)^call\s+(\w+)->(\w+)\((.*)\)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
        ]
    }

    fn description(&self) -> &'static str {
        "call a method on an instance"
    }

    fn example(&self) -> &'static str {
        "CALL pet->fields()"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let target = ctx.capture(1)?;
        let method = ctx.capture(2)?;
        let raw_args = ctx.capture(3)?.trim();

        let mut args = Vec::new();
        if !raw_args.is_empty() {
            let parts = split_top_level(raw_args, ',')
                .ok_or_else(|| ctx.relocate(3, malformed_expression("unbalanced arguments")))?;
            for part in parts {
                args.push(exec.eval(part).map_err(|err| ctx.relocate(3, err.without_span()))?);
            }
        }

        let result = exec
            .call_method(target, method, &args)
            .map_err(|err| ctx.relocate(2, err))?;
        if !result.is_null() {
            exec.print(&result.display_value());
        }
        Ok(result)
    }
}
