#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing would add complexity across the crate"
)]
//! Tally Patterns - values and the operation catalog for the Tally interpreter.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `MapValue`, `ClassDefinition`, `ClassInstance`)
//! - Evaluation error types (`EvalError`, `EvalResult`)
//! - The `OperationDefinition` trait and the `OperationRegistry` that selects
//!   an operation for a statement
//! - Built-in operations (variables, arithmetic, classes, conditionals, loops, goto)
//!
//! # Architecture
//!
//! Operations are zero-sized types registered by static reference. Each one
//! declares a regular expression and the inputs it needs; the registry
//! matches, scores and binds, and the interpreter invokes the winner through
//! the `OperationExecutor` trait:
//! - New operations are added by implementing `OperationDefinition`
//! - Operations never see interpreter internals, only the executor surface
//! - Tests drive operations with a mock executor

mod builtins;
mod context;
mod control;
mod converters;
mod errors;
mod registry;
mod value;

#[cfg(test)]
mod test_helpers;

pub use context::OperationContext;
pub use control::{
    find_terminator, offset_between, BlockKind, ControlStacks, ForeachOwnership, LoopContext,
};
pub use converters::{converter, ConverterFn, CONVERTER_NAMES};
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalResult};
pub use registry::{OperationRegistry, RegistryError, Selection};
pub use value::{
    apply_binary, apply_type, binary_digits, decode_binary, format_number, is_binary_digits,
    loose_equals, split_top_level, ClassDefinition, ClassInstance, LiteralParser, MapValue,
    MethodFn, Shared, Value, TYPE_FIELD,
};

// Re-export error constructors for use by other crates
pub use errors::{
    conversion_failed, division_by_zero, duplicate_class, duplicate_field, duplicate_label,
    duplicate_variable, index_out_of_range, invalid_binary_op, malformed_expression,
    malformed_literal, missing_terminator, no_matching_operation, no_such_member, no_such_method,
    non_boolean_condition, not_indexable, null_reference, step_limit_exceeded, type_mismatch,
    undefined_class, undefined_label, undefined_variable, unexpected_terminator,
    unmatched_bracket, unsupported_input, variant_change,
};

/// What a pattern is matched against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchScope {
    /// The current statement only.
    Statement,
    /// The current statement and every statement after it, joined with `\n`.
    ///
    /// Used by operations that capture a whole block, such as class bodies.
    WholeProgram,
}

/// One input an operation asks the dispatcher to supply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputSpec {
    /// The text of capture group `n`.
    Capture(usize),
    /// Capture group `n` passed through the named converter.
    Converted(usize, &'static str),
    /// Index of the statement being executed.
    CurrentLine,
    /// Read-only snapshot of every statement.
    Lines,
    /// Jump offset written by the operation and applied to the program counter.
    JumpOffset,
}

impl InputSpec {
    /// Short label for listings and error messages.
    pub fn describe(&self) -> String {
        match self {
            InputSpec::Capture(n) => format!("capture {n}"),
            InputSpec::Converted(n, converter) => format!("capture {n} as {converter}"),
            InputSpec::CurrentLine => "current line".to_string(),
            InputSpec::Lines => "lines".to_string(),
            InputSpec::JumpOffset => "jump offset".to_string(),
        }
    }
}

/// Interpreter services available to operations.
///
/// Implemented by the interpreter; operations reach variables, classes,
/// output and control state only through this trait.
pub trait OperationExecutor {
    /// Evaluate an inline expression. Error spans are relative to `expr`.
    fn eval(&mut self, expr: &str) -> EvalResult;

    /// Parse literal text, falling back to expression evaluation, and apply
    /// an optional declared type.
    fn parse_value(&mut self, text: &str, type_name: Option<&str>) -> EvalResult;

    /// Create a variable; fails if it exists.
    fn bind(&mut self, name: &str, value: Value) -> Result<(), EvalError>;

    /// Replace an existing variable with a value of the same variant.
    fn rebind(&mut self, name: &str, value: Value) -> Result<(), EvalError>;

    /// Resolve a variable path such as `pet->tags[0]` or `lib.count()`.
    fn lookup(&mut self, path: &str) -> EvalResult;

    /// Write through a variable path such as `pet->age` or `grid[1][2]`.
    fn assign_path(&mut self, path: &str, value: Value) -> Result<(), EvalError>;

    /// Whether a variable exists.
    fn contains(&self, name: &str) -> bool;

    /// Drop a variable; no-op if absent.
    fn remove(&mut self, name: &str);

    /// Build and register a class from its body lines.
    fn define_class(&mut self, name: &str, body: &[&str]) -> Result<(), EvalError>;

    /// Create an instance of a registered class.
    fn instantiate(&mut self, class: &str) -> EvalResult;

    /// Call a method on the instance stored at `target`.
    fn call_method(&mut self, target: &str, method: &str, args: &[Value]) -> EvalResult;

    /// Write one line of program output.
    fn print(&mut self, text: &str);

    /// Condition and loop stacks.
    fn control(&mut self) -> &mut ControlStacks;

    /// Run `;`-separated statements in place. Their jump offsets are ignored.
    fn execute_inline(&mut self, statements: &str) -> Result<(), EvalError>;
}

/// Trait defining an operation's behavior.
///
/// # Open/Closed Principle
/// Adding an operation requires:
/// 1. Create a type in `builtins/`
/// 2. Implement `OperationDefinition`
/// 3. Register it in `OperationRegistry::builtin()`
///
/// The dispatcher needs no changes.
pub trait OperationDefinition: Send + Sync {
    /// Unique name (e.g., "let", "goto").
    fn name(&self) -> &'static str;

    /// Regular expression the statement must match.
    fn pattern(&self) -> &'static str;

    /// What the pattern is matched against.
    fn scope(&self) -> MatchScope {
        MatchScope::Statement
    }

    /// Inputs the dispatcher binds before invoking.
    fn inputs(&self) -> &'static [InputSpec];

    /// One-line summary for `tally ops`.
    fn description(&self) -> &'static str;

    /// Sample statement for `tally ops`.
    fn example(&self) -> &'static str;

    /// Execute the operation.
    fn invoke(&self, ctx: &mut OperationContext<'_>, exec: &mut dyn OperationExecutor)
        -> EvalResult;
}
