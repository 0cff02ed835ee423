#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing would add complexity across the crate"
)]
//! Tally Eval - the statement dispatcher and expression evaluator.
//!
//! This crate provides:
//! - `Interpreter`: segments a program, runs the program counter and
//!   implements `OperationExecutor` for the built-in operations
//! - `Evaluator`: left-to-right inline expressions with conditional assignment
//! - `VariableStore`: the flat variable namespace with path reads and writes
//! - `ClassRegistry`: class definitions and native methods
//! - Print handlers so callers can capture program output

mod classes;
mod environment;
mod evaluator;
mod interpreter;
mod print_handler;

pub use classes::{ClassRegistry, FieldDecl};
pub use environment::{
    walk, write, AssignError, IndexKey, IndexLookup, PathSegment, VarPath, VariableStore,
};
pub use evaluator::{evaluate, Evaluator, Scope};
pub use interpreter::{segment, Interpreter, InterpreterBuilder};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
