//! Test helpers for operation unit testing.
//!
//! Provides `MockExecutor` for running operations in isolation without the
//! interpreter, plus `run_line` which drives one statement through the
//! built-in registry exactly as the dispatcher does.

use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::errors::{
    duplicate_variable, no_matching_operation, undefined_class, undefined_variable,
    variant_change, EvalError,
};
use crate::value::{apply_type, LiteralParser};
use crate::{
    ClassDefinition, ControlStacks, EvalResult, OperationExecutor, OperationRegistry, Value,
};

/// Mock executor for testing operations in isolation.
///
/// `eval` answers from scripted results first, then literal inference, then
/// the variable table. Everything else is recorded for assertions.
#[derive(Default)]
pub struct MockExecutor {
    pub vars: FxHashMap<String, Value>,
    scripted: FxHashMap<String, VecDeque<Value>>,
    classes: Vec<String>,
    pub defined: Vec<(String, Vec<String>)>,
    pub output: Vec<String>,
    pub inline_runs: Vec<String>,
    pub control: ControlStacks,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable.
    pub fn with_var(mut self, name: &str, value: Value) -> Self {
        self.vars.insert(name.to_string(), value);
        self
    }

    /// Make `eval(expr)` return `results` in order; the last one repeats.
    pub fn with_results(mut self, expr: &str, results: Vec<Value>) -> Self {
        self.scripted.insert(expr.to_string(), results.into());
        self
    }

    /// Register a class `instantiate` accepts.
    pub fn with_class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }
}

impl OperationExecutor for MockExecutor {
    fn eval(&mut self, expr: &str) -> EvalResult {
        let expr = expr.trim();
        if let Some(queue) = self.scripted.get_mut(expr) {
            let next = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            };
            if let Some(value) = next {
                return Ok(value);
            }
        }
        if let Some(value) = LiteralParser::new().infer(expr)? {
            return Ok(value);
        }
        self.vars
            .get(expr)
            .cloned()
            .ok_or_else(|| undefined_variable(expr))
    }

    fn parse_value(&mut self, text: &str, type_name: Option<&str>) -> EvalResult {
        let value = self.eval(text)?;
        match type_name {
            Some(ty) => apply_type(value, ty),
            None => Ok(value),
        }
    }

    fn bind(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.vars.contains_key(name) {
            return Err(duplicate_variable(name));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    fn rebind(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        let slot = self
            .vars
            .get_mut(name)
            .ok_or_else(|| undefined_variable(name))?;
        if !slot.same_variant(&value) {
            return Err(variant_change(name, slot.type_name(), value.type_name()));
        }
        *slot = value;
        Ok(())
    }

    fn lookup(&mut self, path: &str) -> EvalResult {
        self.vars
            .get(path)
            .cloned()
            .ok_or_else(|| undefined_variable(path))
    }

    fn assign_path(&mut self, path: &str, value: Value) -> Result<(), EvalError> {
        self.vars.insert(path.to_string(), value);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }

    fn define_class(&mut self, name: &str, body: &[&str]) -> Result<(), EvalError> {
        self.classes.push(name.to_string());
        self.defined.push((
            name.to_string(),
            body.iter().map(ToString::to_string).collect(),
        ));
        Ok(())
    }

    fn instantiate(&mut self, class: &str) -> EvalResult {
        if !self.classes.iter().any(|c| c == class) {
            return Err(undefined_class(class));
        }
        Ok(Value::instance(Rc::new(ClassDefinition::new(class)).instantiate()))
    }

    fn call_method(&mut self, target: &str, method: &str, args: &[Value]) -> EvalResult {
        match self.lookup(target)? {
            Value::Instance(instance) => instance.borrow().call_method(method, args),
            other => Err(crate::errors::no_such_method(other.type_name(), method)),
        }
    }

    fn print(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn control(&mut self) -> &mut ControlStacks {
        &mut self.control
    }

    fn execute_inline(&mut self, statements: &str) -> Result<(), EvalError> {
        self.inline_runs.push(statements.to_string());
        Ok(())
    }
}

/// Statements as the dispatcher stores them.
pub fn program(statements: &[&str]) -> Vec<String> {
    statements.iter().map(ToString::to_string).collect()
}

/// Select, bind and invoke the operation for `lines[line]`.
///
/// Returns the operation's result and the jump offset it set.
pub fn run_line(
    exec: &mut MockExecutor,
    lines: &[String],
    line: usize,
) -> Result<(Value, isize), EvalError> {
    let registry = OperationRegistry::builtin().map_err(|err| EvalError::new(err.to_string()))?;
    let statement = lines
        .get(line)
        .ok_or_else(|| EvalError::new(format!("no statement {line}")))?;
    let remaining = lines[line..].join("\n");
    let selection = registry.select(statement, &remaining).ok_or_else(|| {
        no_matching_operation(statement, registry.longest_partial_match(statement))
    })?;
    let mut ctx = registry.bind(&selection, line, lines)?;
    let value = selection.operation.invoke(&mut ctx, exec)?;
    Ok((value, ctx.jump()))
}
