//! Diagnostic system for rich error reporting.
//!
//! Every fatal error in a Tally run becomes one [`Diagnostic`]:
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - The failing statement with a caret underline (where it went wrong)
//! - Notes and suggestions (how to fix)

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{
    duplicate_definition, no_matching_operation, unclosed_delimiter, Diagnostic, Label, Severity,
    SourceLine,
};
pub use error_code::ErrorCode;
