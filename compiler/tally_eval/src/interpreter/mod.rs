//! Statement dispatcher and program counter.
//!
//! A program is a flat array of statements. The interpreter keeps one
//! program counter over it; each statement is matched against the operation
//! registry, the winning operation runs, and the counter moves by
//! `1 + jump`, where `jump` is whatever offset the operation reported.
//! Loops, conditionals, class blocks and `goto` are all expressed through
//! that single offset.
//!
//! # Example
//!
//! ```text
//! let n = 0;
//! top:
//! n = n + 1;
//! IF n < 3 THEN goto top ENDIF
//! print n;                      // 3
//! ```
//!
//! Variables and classes persist across [`Interpreter::run`] calls; control
//! stacks and the step counter are reset at the start of each run.

mod builder;
mod segment;

use std::rc::Rc;

use tally_patterns::{
    apply_type, binary_digits, decode_binary, malformed_expression, no_matching_operation,
    no_such_method, split_top_level, step_limit_exceeded, ClassDefinition, ControlStacks,
    EvalError, EvalResult, LiteralParser, MapValue, MethodFn, OperationExecutor,
    OperationRegistry, Value,
};
use tracing::{debug, trace};

use crate::classes::{ClassRegistry, FieldDecl};
use crate::environment::{walk, VarPath, VariableStore};
use crate::evaluator::{evaluate, Scope};
use crate::print_handler::SharedPrintHandler;

pub use builder::InterpreterBuilder;
pub use segment::segment;

/// Runs Tally programs.
pub struct Interpreter {
    registry: Rc<OperationRegistry>,
    store: VariableStore,
    classes: ClassRegistry,
    control: ControlStacks,
    print_handler: SharedPrintHandler,
    max_steps: Option<u64>,
    steps: u64,
    /// Statements of the loaded program.
    lines: Rc<[String]>,
    /// Statements joined with `\n`, for whole-program patterns.
    program: Rc<str>,
    /// Byte offset of each statement in `program`.
    starts: Vec<usize>,
    /// Statement currently executing.
    current: usize,
}

impl Interpreter {
    /// Interpreter with the built-in operations, printing to stdout.
    pub fn new() -> Result<Self, tally_patterns::RegistryError> {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Segment and run `source`.
    pub fn run(&mut self, source: &str) -> Result<(), EvalError> {
        self.execute(segment(source))
    }

    /// Run already segmented statements.
    pub fn execute(&mut self, statements: Vec<String>) -> Result<(), EvalError> {
        self.load(statements);
        let total = self.lines.len();
        debug!(statements = total, "program loaded");

        let mut pc = 0usize;
        while pc < total {
            self.tick()?;
            let jump = self.execute_statement(pc)?;
            pc = 1isize
                .checked_add(jump)
                .and_then(|step| pc.checked_add_signed(step))
                .ok_or_else(|| {
                    EvalError::new(format!("jump of {jump} leaves the program"))
                        .at_statement(pc, &self.lines[pc])
                })?;
        }
        Ok(())
    }

    /// Statements no operation accepts, without running anything.
    pub fn check(&self, source: &str) -> Vec<EvalError> {
        let statements = segment(source);
        let program = statements.join("\n");
        let mut offset = 0;
        let mut problems = Vec::new();
        for (line, statement) in statements.iter().enumerate() {
            if self.registry.select(statement, &program[offset..]).is_none() {
                let matched = self.registry.longest_partial_match(statement);
                problems
                    .push(no_matching_operation(statement, matched).at_statement(line, statement));
            }
            offset += statement.len() + 1;
        }
        problems
    }

    fn load(&mut self, statements: Vec<String>) {
        let mut starts = Vec::with_capacity(statements.len());
        let mut offset = 0;
        for statement in &statements {
            starts.push(offset);
            offset += statement.len() + 1;
        }
        self.program = statements.join("\n").into();
        self.lines = statements.into();
        self.starts = starts;
        self.control = ControlStacks::default();
        self.steps = 0;
    }

    fn tick(&mut self) -> Result<(), EvalError> {
        self.steps += 1;
        match self.max_steps {
            Some(limit) if self.steps > limit => Err(step_limit_exceeded(limit)),
            _ => Ok(()),
        }
    }

    /// Dispatch statement `line` and return its jump offset.
    fn execute_statement(&mut self, line: usize) -> Result<isize, EvalError> {
        let lines = Rc::clone(&self.lines);
        let program = Rc::clone(&self.program);
        let statement = lines[line].as_str();
        let rest = &program[self.starts[line]..];
        self.current = line;
        self.dispatch(statement, rest, &lines, line)
            .map_err(|err| err.at_statement(line, statement))
    }

    fn dispatch(
        &mut self,
        statement: &str,
        rest: &str,
        lines: &[String],
        line: usize,
    ) -> Result<isize, EvalError> {
        let registry = Rc::clone(&self.registry);
        let selection = registry.select(statement, rest).ok_or_else(|| {
            no_matching_operation(statement, registry.longest_partial_match(statement))
        })?;
        debug!(
            pc = line,
            operation = selection.operation.name(),
            score = selection.score,
            "dispatch"
        );
        let mut ctx = registry.bind(&selection, line, lines)?;
        selection.operation.invoke(&mut ctx, self)?;
        Ok(ctx.jump())
    }

    /// Attach a native method to a class, defined now or later.
    pub fn define_method(
        &mut self,
        class: &str,
        method: &str,
        func: MethodFn,
    ) -> Result<(), EvalError> {
        self.classes.define_method(class, method, func)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.store
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Statements of the most recently loaded program.
    pub fn statements(&self) -> &[String] {
        &self.lines
    }

    /// Output captured by a buffer print handler; empty otherwise.
    pub fn output(&self) -> String {
        self.print_handler.get_output()
    }

    /// Statements dispatched during the last run, inline ones included.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl OperationExecutor for Interpreter {
    fn eval(&mut self, expr: &str) -> EvalResult {
        evaluate(expr, &mut self.store)
    }

    fn parse_value(&mut self, text: &str, type_name: Option<&str>) -> EvalResult {
        parse_text(text, type_name, &self.classes, &mut self.store)
    }

    fn bind(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        Ok(self.store.bind(name, value)?)
    }

    fn rebind(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        Ok(self.store.rebind(name, value)?)
    }

    fn lookup(&mut self, path: &str) -> EvalResult {
        self.store.resolve(path)
    }

    fn assign_path(&mut self, path: &str, value: Value) -> Result<(), EvalError> {
        self.store.assign(path, value)
    }

    fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    fn remove(&mut self, name: &str) {
        if self.store.remove(name).is_some() {
            trace!(name, "removed");
        }
    }

    fn define_class(&mut self, name: &str, body: &[&str]) -> Result<(), EvalError> {
        let mut class = ClassDefinition::new(name);
        for line in body {
            let decl = FieldDecl::parse(line)?;
            let value = {
                let mut scope = FieldScope {
                    store: &mut self.store,
                    fields: class.fields(),
                };
                parse_text(decl.expr, decl.type_name, &self.classes, &mut scope).map_err(|err| {
                    err.without_span()
                        .with_note(format!("in field `{}`", decl.name))
                })?
            };
            class.add_field(decl.name, value, decl.overwrite)?;
        }
        self.classes.register(class)?;
        Ok(())
    }

    fn instantiate(&mut self, class: &str) -> EvalResult {
        self.classes.instantiate(class)
    }

    fn call_method(&mut self, target: &str, method: &str, args: &[Value]) -> EvalResult {
        match self.store.resolve(target)? {
            Value::Instance(instance) => instance.borrow().call_method(method, args),
            other => Err(no_such_method(&other.describe_type(), method)),
        }
    }

    fn print(&mut self, text: &str) {
        self.print_handler.println(text);
    }

    fn control(&mut self) -> &mut ControlStacks {
        &mut self.control
    }

    fn execute_inline(&mut self, statements: &str) -> Result<(), EvalError> {
        let parts = split_top_level(statements, ';')
            .ok_or_else(|| malformed_expression("unbalanced inline statements"))?;
        let lines = Rc::clone(&self.lines);
        let line = self.current;
        for part in parts.into_iter().filter(|part| !part.is_empty()) {
            self.tick()?;
            self.dispatch(part, part, &lines, line).map_err(|err| {
                err.without_span()
                    .with_note(format!("in inline statement `{part}`"))
            })?;
        }
        Ok(())
    }
}

/// Name resolution inside a class body: earlier fields first, then
/// variables.
struct FieldScope<'a> {
    store: &'a mut VariableStore,
    fields: &'a MapValue,
}

impl Scope for FieldScope<'_> {
    fn resolve(&self, path: &str) -> EvalResult {
        let path = VarPath::parse(path)?;
        match self.fields.get(&path.root) {
            Some(value) => walk(value.clone(), &path.segments, &|name| {
                self.store.get(name).cloned()
            }),
            None => self.store.resolve_parsed(&path),
        }
    }

    fn assign(&mut self, path: &str, value: Value) -> Result<(), EvalError> {
        self.store.assign(path, value)
    }
}

/// Turn value text into a value: `Class:new`, a class name with `as class`,
/// a literal, or an expression, then apply the declared type.
fn parse_text<S: Scope + ?Sized>(
    text: &str,
    type_name: Option<&str>,
    classes: &ClassRegistry,
    scope: &mut S,
) -> EvalResult {
    let text = text.trim();
    // Bare digits would otherwise infer as a number.
    if let Some(digits) = type_name
        .filter(|ty| ty.trim().eq_ignore_ascii_case("binary"))
        .and_then(|_| binary_digits(text))
    {
        return decode_binary(digits);
    }
    let value = if let Some(class) = instance_request(text) {
        classes.instantiate(class)?
    } else if let Some(class) = type_name
        .filter(|ty| ty.eq_ignore_ascii_case("class"))
        .and_then(|_| classes.get(text))
    {
        Value::class_ref(Rc::clone(class))
    } else {
        let literal = {
            let reader: &S = &*scope;
            let resolve = |path: &str| reader.resolve(path);
            LiteralParser::with_resolver(&resolve).infer(text)?
        };
        match literal {
            Some(value) => value,
            None => evaluate(text, scope)?,
        }
    };
    match type_name {
        Some(ty) => apply_type(value, ty),
        None => Ok(value),
    }
}

/// `Name:new` → `Name`.
fn instance_request(text: &str) -> Option<&str> {
    let class = text.strip_suffix(":new")?;
    let mut chars = class.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(class)
}

#[cfg(test)]
mod tests;
