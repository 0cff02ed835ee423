//! Tally IR - shared types used by every stage of the interpreter.
//!
//! Statements are short, line-oriented strings, so the shared vocabulary is
//! small: a byte [`Span`] into a statement and the [`BinaryOp`] set of the
//! inline expression language.

mod operators;
mod span;

pub use operators::BinaryOp;
pub use span::{Span, SpanError};
