//! Variable operations: `let`, assignment, path `set`, `get`, `print`, `count`.

use crate::{EvalResult, InputSpec, OperationContext, OperationDefinition, OperationExecutor, Value};

/// `let name = value [as type]`: create a variable.
pub struct LetOperation;

impl OperationDefinition for LetOperation {
    fn name(&self) -> &'static str {
        "let"
    }

    fn pattern(&self) -> &'static str {
        r"^let\s+(\w+)\s*=\s*(.+?)(?:\s+as\s+(.+))?$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
        ]
    }

    fn description(&self) -> &'static str {
        "create a variable from a literal or expression"
    }

    fn example(&self) -> &'static str {
        "let total = 2 + 2 as int"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let value = ctx.parse_capture(2, 3, exec)?;
        exec.bind(name, value.clone())
            .map_err(|err| ctx.relocate(1, err))?;
        Ok(value)
    }
}

/// `name = value [as type]`: replace an existing variable.
pub struct AssignOperation;

impl OperationDefinition for AssignOperation {
    fn name(&self) -> &'static str {
        "assign"
    }

    fn pattern(&self) -> &'static str {
        r"^(\w+)\s*=\s*(.+?)(?:\s+as\s+(.+))?$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
        ]
    }

    fn description(&self) -> &'static str {
        "reassign a variable; the new value must keep its type"
    }

    fn example(&self) -> &'static str {
        "total = total * 2"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let name = ctx.capture(1)?;
        let value = ctx.parse_capture(2, 3, exec)?;
        exec.rebind(name, value.clone())
            .map_err(|err| ctx.relocate(1, err))?;
        Ok(value)
    }
}

/// `[set] root->path = value [as type]`: write through a member or index path.
pub struct SetOperation;

impl OperationDefinition for SetOperation {
    fn name(&self) -> &'static str {
        "set"
    }

    fn pattern(&self) -> &'static str {
        r"^(?:set\s+)?(\w+)((?:->|\.|\[)[^=]*?)\s*=\s*(.+?)(?:\s+as\s+(.+))?$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[
            InputSpec::Capture(1),
            InputSpec::Capture(2),
            InputSpec::Capture(3),
            InputSpec::Capture(4),
        ]
    }

    fn description(&self) -> &'static str {
        "write a field, map entry or array element"
    }

    fn example(&self) -> &'static str {
        "pet->age = 4"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let path = format!("{}{}", ctx.capture(1)?, ctx.capture(2)?.trim_end());
        let value = ctx.parse_capture(3, 4, exec)?;
        exec.assign_path(&path, value.clone())
            .map_err(|err| ctx.relocate(2, err))?;
        Ok(value)
    }
}

/// `get path`: print and return the value at a path.
pub struct GetOperation;

impl OperationDefinition for GetOperation {
    fn name(&self) -> &'static str {
        "get"
    }

    fn pattern(&self) -> &'static str {
        r"(?i)^get\s+(.+)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::Capture(1)]
    }

    fn description(&self) -> &'static str {
        "print the value at a variable path"
    }

    fn example(&self) -> &'static str {
        "get lib->books[0]->title"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let path = ctx.capture(1)?.trim();
        let value = exec.lookup(path).map_err(|err| ctx.relocate(1, err))?;
        exec.print(&value.display_value());
        Ok(value)
    }
}

/// `print expr`: evaluate and print.
pub struct PrintOperation;

impl OperationDefinition for PrintOperation {
    fn name(&self) -> &'static str {
        "print"
    }

    fn pattern(&self) -> &'static str {
        r"^print\s+(.+)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::Capture(1)]
    }

    fn description(&self) -> &'static str {
        "evaluate an expression and print the result"
    }

    fn example(&self) -> &'static str {
        "print \"n = \" + n"
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let value = ctx.eval_capture(1, exec)?;
        exec.print(&value.display_value());
        Ok(value)
    }
}

/// `count text`: print the character length of the argument.
pub struct CountOperation;

impl OperationDefinition for CountOperation {
    fn name(&self) -> &'static str {
        "count"
    }

    fn pattern(&self) -> &'static str {
        r"^count\s+(.+)$"
    }

    fn inputs(&self) -> &'static [InputSpec] {
        &[InputSpec::Converted(1, "length")]
    }

    fn description(&self) -> &'static str {
        "print the number of characters in the argument"
    }

    fn example(&self) -> &'static str {
        "count \"hello\""
    }

    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor) -> EvalResult {
        let length: Value = ctx.converted(1)?;
        exec.print(&length.display_value());
        Ok(length)
    }
}
