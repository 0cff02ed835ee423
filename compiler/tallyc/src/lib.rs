#![allow(
    clippy::result_large_err,
    reason = "Diagnostic carries the rendered statement; runs fail at most once"
)]
//! Tally - command line driver.
//!
//! Turns a `.tly` file into a run:
//!
//! ```text
//! source text
//!     │  middleware: comments, multi-line flattening, whitespace
//!     ▼
//! normalized text ──► segment() ──► statements
//!     │
//!     ▼
//! Interpreter::run ──► EvalError ──► Diagnostic ──► TerminalEmitter
//! ```

pub mod commands;
pub mod config;
pub mod driver;
pub mod input;
pub mod middleware;
pub mod problem;
pub mod tracing_setup;

pub use config::{ConfigError, InterpreterConfig, PrintTarget};
pub use driver::{check_source, run_source};
pub use input::{is_source_path, read_source, LoadError, SOURCE_EXTENSION};
pub use middleware::{
    FlattenMultiline, Middleware, MiddlewarePipeline, RemoveComments, TrimWhitespace,
};
pub use problem::eval_error_to_diagnostic;
