//! Error codes for all interpreter diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E6001`) with the first digit
//! indicating the phase that detected it. Used for `--explain` lookups.

use std::fmt;

/// Error codes for all interpreter diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Statement syntax and block structure
/// - E2xxx: Parameter binding
/// - E6xxx: Runtime / eval errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Syntax / Structure (E1xxx)
    /// No operation pattern matches the statement
    E1001,
    /// Unbalanced bracket in an expression
    E1002,
    /// Block opened without its terminator
    E1003,
    /// Block terminator without an opener
    E1004,
    /// Malformed literal or expression
    E1005,

    // Binding (E2xxx)
    /// Captured text rejected by a value converter
    E2001,
    /// Operation declares an input the dispatcher cannot supply
    E2002,

    // Runtime / Eval (E6xxx)
    /// Division by zero
    E6001,
    /// Type mismatch
    E6010,
    /// Invalid operator for operand type
    E6011,
    /// Reassignment changes the value's variant
    E6012,
    /// Condition did not evaluate to a boolean
    E6013,
    /// Undefined variable
    E6020,
    /// Undefined class
    E6021,
    /// Undefined member
    E6022,
    /// Undefined method
    E6023,
    /// Undefined label
    E6024,
    /// Index out of range
    E6025,
    /// Target is not indexable
    E6026,
    /// Member access on null
    E6027,
    /// Variable already defined
    E6030,
    /// Class already registered
    E6031,
    /// Field defined twice without overwrite marker
    E6032,
    /// Label defined twice
    E6033,
    /// Step limit exceeded
    E6040,
    /// Custom runtime error
    E6099,

    // Internal Errors (E9xxx)
    /// Internal interpreter error
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// Kept in sync with `as_str()` which is exhaustive (Rust match enforces it).
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E6001,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6012,
        ErrorCode::E6013,
        ErrorCode::E6020,
        ErrorCode::E6021,
        ErrorCode::E6022,
        ErrorCode::E6023,
        ErrorCode::E6024,
        ErrorCode::E6025,
        ErrorCode::E6026,
        ErrorCode::E6027,
        ErrorCode::E6030,
        ErrorCode::E6031,
        ErrorCode::E6032,
        ErrorCode::E6033,
        ErrorCode::E6040,
        ErrorCode::E6099,
        ErrorCode::E9001,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6021 => "E6021",
            ErrorCode::E6022 => "E6022",
            ErrorCode::E6023 => "E6023",
            ErrorCode::E6024 => "E6024",
            ErrorCode::E6025 => "E6025",
            ErrorCode::E6026 => "E6026",
            ErrorCode::E6027 => "E6027",
            ErrorCode::E6030 => "E6030",
            ErrorCode::E6031 => "E6031",
            ErrorCode::E6032 => "E6032",
            ErrorCode::E6033 => "E6033",
            ErrorCode::E6040 => "E6040",
            ErrorCode::E6099 => "E6099",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line explanation used by `tally --explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "no operation pattern matches the statement",
            ErrorCode::E1002 => "an expression contains an unbalanced bracket",
            ErrorCode::E1003 => "a block was opened but its terminator was never found",
            ErrorCode::E1004 => "a block terminator appeared without a matching opener",
            ErrorCode::E1005 => "a literal or expression could not be parsed",
            ErrorCode::E2001 => "captured text could not be converted for the operation",
            ErrorCode::E2002 => "an operation declared an input the dispatcher cannot supply",
            ErrorCode::E6001 => "division by zero",
            ErrorCode::E6010 => "a value has the wrong type for the requested use",
            ErrorCode::E6011 => "the operator cannot be applied to the operand type",
            ErrorCode::E6012 => "reassignment would change the variable's type",
            ErrorCode::E6013 => "a condition must evaluate to a boolean",
            ErrorCode::E6020 => "the variable is not defined",
            ErrorCode::E6021 => "the class is not registered",
            ErrorCode::E6022 => "the value has no such field",
            ErrorCode::E6023 => "the class has no such method",
            ErrorCode::E6024 => "the goto target label does not exist",
            ErrorCode::E6025 => "the index is outside the collection",
            ErrorCode::E6026 => "the value cannot be indexed",
            ErrorCode::E6027 => "a member was accessed on a null value",
            ErrorCode::E6030 => "the variable is already defined; use assignment instead of let",
            ErrorCode::E6031 => "a class with this name is already registered",
            ErrorCode::E6032 => "the field is defined twice; mark the later one with $overwrite$",
            ErrorCode::E6033 => "the label is defined more than once",
            ErrorCode::E6040 => "the run exceeded the configured step limit",
            ErrorCode::E6099 => "runtime error",
            ErrorCode::E9001 => "internal interpreter error",
        }
    }

    /// Look up a code by its string form (case-insensitive).
    pub fn parse(code: &str) -> Option<ErrorCode> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code.trim()))
    }

    /// Check if this is a syntax/structure error (E1xxx range).
    pub fn is_syntax_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a binding error (E2xxx range).
    pub fn is_binding_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a runtime/eval error (E6xxx range).
    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
