//! Error types for statement execution.
//!
//! `EvalErrorKind` provides typed error categories for diagnostic conversion.
//! Factory functions (e.g., `division_by_zero()`) are the public API; they
//! populate both `kind` and `message`.
//!
//! Spans on an `EvalError` are byte ranges into the failing statement. The
//! evaluator reports spans relative to the expression it was given; the
//! operation that handed it that expression shifts them by the capture's
//! offset (see [`EvalError::shifted`]).

use std::fmt;

use tally_ir::{BinaryOp, Span};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse failure families shown to users.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    /// No operation accepts the statement, or a literal is malformed.
    Syntax,
    /// A pattern matched but a captured input could not be bound.
    Binding,
    /// Wrong variant for an operator, cast or declared type.
    Type,
    /// Unknown variable, class, member, method or label.
    Undefined,
    /// Redefinition of something that must be unique.
    Duplicate,
    /// Unbalanced brackets or block markers.
    Structural,
    /// Bad index or non-indexable target.
    Index,
    /// Division by zero.
    Arithmetic,
    /// Everything else (custom errors, step limit).
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Syntax => "SyntaxError",
            Self::Binding => "BindingError",
            Self::Type => "TypeError",
            Self::Undefined => "UndefinedError",
            Self::Duplicate => "DuplicateError",
            Self::Structural => "StructuralError",
            Self::Index => "IndexError",
            Self::Arithmetic => "ArithmeticError",
            Self::Runtime => "RuntimeError",
        };
        f.write_str(name)
    }
}

/// Typed error category for structured diagnostics.
///
/// Each variant carries the data needed to render its message, so callers
/// match on the kind rather than parsing strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Syntax
    NoMatchingOperation {
        statement: String,
        /// Byte length of the longest prefix some pattern accepted.
        matched: usize,
    },
    MalformedLiteral {
        text: String,
        reason: String,
    },
    MalformedExpression {
        reason: String,
    },

    // Binding
    ConversionFailed {
        converter: String,
        input: String,
        reason: String,
    },
    UnsupportedInput {
        operation: String,
        input: String,
    },

    // Type
    TypeMismatch {
        expected: String,
        got: String,
    },
    InvalidBinaryOp {
        type_name: String,
        op: BinaryOp,
    },
    VariantChange {
        name: String,
        expected: String,
        got: String,
    },
    NonBooleanCondition {
        expression: String,
        got: String,
    },

    // Undefined
    UndefinedVariable {
        name: String,
    },
    UndefinedClass {
        name: String,
    },
    NoSuchMember {
        type_name: String,
        member: String,
    },
    NoSuchMethod {
        class: String,
        method: String,
    },
    UndefinedLabel {
        name: String,
    },
    NullReference {
        member: String,
    },

    // Index
    IndexOutOfRange {
        index: i64,
        len: usize,
    },
    NotIndexable {
        type_name: String,
    },

    // Duplicate
    DuplicateVariable {
        name: String,
    },
    DuplicateClass {
        name: String,
    },
    DuplicateField {
        class: String,
        field: String,
    },
    DuplicateLabel {
        name: String,
    },

    // Structural
    UnmatchedBracket {
        delimiter: char,
    },
    MissingTerminator {
        opener: String,
        terminator: String,
    },
    UnexpectedTerminator {
        terminator: String,
    },

    // Arithmetic
    DivisionByZero,

    // Runtime
    StepLimitExceeded {
        limit: u64,
    },
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// The user-facing family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoMatchingOperation { .. }
            | Self::MalformedLiteral { .. }
            | Self::MalformedExpression { .. } => ErrorCategory::Syntax,
            Self::ConversionFailed { .. } | Self::UnsupportedInput { .. } => {
                ErrorCategory::Binding
            }
            Self::TypeMismatch { .. }
            | Self::InvalidBinaryOp { .. }
            | Self::VariantChange { .. }
            | Self::NonBooleanCondition { .. } => ErrorCategory::Type,
            Self::UndefinedVariable { .. }
            | Self::UndefinedClass { .. }
            | Self::NoSuchMember { .. }
            | Self::NoSuchMethod { .. }
            | Self::UndefinedLabel { .. }
            | Self::NullReference { .. } => ErrorCategory::Undefined,
            Self::IndexOutOfRange { .. } | Self::NotIndexable { .. } => ErrorCategory::Index,
            Self::DuplicateVariable { .. }
            | Self::DuplicateClass { .. }
            | Self::DuplicateField { .. }
            | Self::DuplicateLabel { .. } => ErrorCategory::Duplicate,
            Self::UnmatchedBracket { .. }
            | Self::MissingTerminator { .. }
            | Self::UnexpectedTerminator { .. } => ErrorCategory::Structural,
            Self::DivisionByZero => ErrorCategory::Arithmetic,
            Self::StepLimitExceeded { .. } | Self::Custom { .. } => ErrorCategory::Runtime,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingOperation { statement, matched } => {
                if *matched > 0 && *matched < statement.len() {
                    let (head, rest) = statement.split_at(*matched);
                    write!(f, "{head} Invalid token \"{rest}\"")
                } else {
                    write!(f, "Invalid token: \"{statement}\"")
                }
            }
            Self::MalformedLiteral { text, reason } => {
                write!(f, "malformed literal `{text}`: {reason}")
            }
            Self::MalformedExpression { reason } => write!(f, "malformed expression: {reason}"),

            Self::ConversionFailed {
                converter,
                input,
                reason,
            } => write!(f, "converter `{converter}` rejected \"{input}\": {reason}"),
            Self::UnsupportedInput { operation, input } => {
                write!(f, "operation `{operation}` did not declare input `{input}`")
            }

            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { type_name, op } => {
                write!(
                    f,
                    "operator `{}` cannot be applied to {type_name}",
                    op.as_symbol()
                )
            }
            Self::VariantChange {
                name,
                expected,
                got,
            } => write!(
                f,
                "cannot reassign `{name}`: it holds {expected}, new value is {got}"
            ),
            Self::NonBooleanCondition { expression, got } => {
                write!(f, "condition `{expression}` must be a boolean, got {got}")
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::UndefinedClass { name } => write!(f, "undefined class: {name}"),
            Self::NoSuchMember { type_name, member } => {
                write!(f, "{type_name} has no member `{member}`")
            }
            Self::NoSuchMethod { class, method } => {
                write!(f, "class `{class}` has no method `{method}`")
            }
            Self::UndefinedLabel { name } => write!(f, "no label named `{name}`"),
            Self::NullReference { member } => {
                write!(f, "cannot access `{member}` on null")
            }

            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::NotIndexable { type_name } => write!(f, "{type_name} cannot be indexed"),

            Self::DuplicateVariable { name } => {
                write!(f, "variable `{name}` is already defined")
            }
            Self::DuplicateClass { name } => write!(f, "class `{name}` is already defined"),
            Self::DuplicateField { class, field } => write!(
                f,
                "field `{field}` is already defined in class `{class}`; use $overwrite$ to replace it"
            ),
            Self::DuplicateLabel { name } => write!(f, "label `{name}` is defined more than once"),

            Self::UnmatchedBracket { delimiter } => {
                write!(f, "unmatched bracket `{delimiter}`")
            }
            Self::MissingTerminator { opener, terminator } => {
                write!(f, "`{opener}` is missing its `{terminator}`")
            }
            Self::UnexpectedTerminator { terminator } => {
                write!(f, "`{terminator}` without a matching opener")
            }

            Self::DivisionByZero => write!(f, "division by zero"),

            Self::StepLimitExceeded { limit } => {
                write!(f, "step limit of {limit} statements exceeded")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured error category for diagnostic conversion.
    pub kind: EvalErrorKind,
    /// Human-readable error message; equals `kind.to_string()` for
    /// factory-created errors.
    pub message: String,
    /// Byte range within the failing statement.
    pub span: Option<Span>,
    /// 0-based index of the failing statement, filled in by the dispatcher.
    pub line: Option<usize>,
    /// Text of the failing statement, filled in by the dispatcher.
    pub statement: Option<String>,
    /// Additional context notes.
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the factory functions when a structured
    /// kind is available.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
            line: None,
            statement: None,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            line: None,
            statement: None,
            notes: Vec::new(),
        }
    }

    /// Attach a span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a span only if none is set yet.
    #[must_use]
    pub fn with_span_if_absent(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Drop the span, for errors raised while re-running text from another
    /// statement.
    #[must_use]
    pub fn without_span(mut self) -> Self {
        self.span = None;
        self
    }

    /// Re-base the span onto an enclosing text that starts `offset` bytes
    /// earlier. Errors without a span get `fallback` instead.
    #[must_use]
    pub fn shifted(mut self, offset: usize, fallback: Span) -> Self {
        let offset = u32::try_from(offset).unwrap_or(u32::MAX);
        self.span = Some(match self.span {
            Some(span) => span.shifted(offset),
            None => fallback,
        });
        self
    }

    /// Record the failing statement, unless an inner dispatch already did.
    #[must_use]
    pub fn at_statement(mut self, line: usize, statement: &str) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.statement = Some(statement.to_string());
        }
        self
    }

    /// Add a context note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The user-facing family of this error.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

// Syntax

/// No registered operation accepts the statement.
#[cold]
pub fn no_matching_operation(statement: &str, matched: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMatchingOperation {
        statement: statement.to_string(),
        matched,
    })
}

/// Literal text that looks like an array/map/number but does not parse.
#[cold]
pub fn malformed_literal(text: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedLiteral {
        text: text.to_string(),
        reason: reason.into(),
    })
}

/// Expression token stream that cannot be evaluated.
#[cold]
pub fn malformed_expression(reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedExpression {
        reason: reason.into(),
    })
}

// Binding

/// A value converter rejected its captured text.
#[cold]
pub fn conversion_failed(converter: &str, input: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConversionFailed {
        converter: converter.to_string(),
        input: input.to_string(),
        reason: reason.into(),
    })
}

/// An operation asked for an input it never declared.
#[cold]
pub fn unsupported_input(operation: &str, input: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedInput {
        operation: operation.to_string(),
        input: input.to_string(),
    })
}

// Type

/// Value has the wrong variant.
#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Operator not supported for the operand's type.
#[cold]
pub fn invalid_binary_op(type_name: &str, op: BinaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

/// Reassignment would change a variable's variant.
#[cold]
pub fn variant_change(name: &str, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VariantChange {
        name: name.to_string(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Condition evaluated to something other than a boolean.
#[cold]
pub fn non_boolean_condition(expression: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonBooleanCondition {
        expression: expression.to_string(),
        got: got.to_string(),
    })
}

// Undefined

/// Undefined variable.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Undefined class.
#[cold]
pub fn undefined_class(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedClass {
        name: name.to_string(),
    })
}

/// Field or key not present on the value.
#[cold]
pub fn no_such_member(type_name: &str, member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMember {
        type_name: type_name.to_string(),
        member: member.to_string(),
    })
}

/// Method not defined by the instance's class.
#[cold]
pub fn no_such_method(class: &str, method: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMethod {
        class: class.to_string(),
        method: method.to_string(),
    })
}

/// `goto` target does not exist.
#[cold]
pub fn undefined_label(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedLabel {
        name: name.to_string(),
    })
}

/// Member access on `null`.
#[cold]
pub fn null_reference(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullReference {
        member: member.to_string(),
    })
}

// Index

/// Index outside the collection.
#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

/// Indexing applied to a scalar.
#[cold]
pub fn not_indexable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        type_name: type_name.to_string(),
    })
}

// Duplicate

/// `let` on a name that already exists.
#[cold]
pub fn duplicate_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateVariable {
        name: name.to_string(),
    })
}

/// Class registered twice.
#[cold]
pub fn duplicate_class(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateClass {
        name: name.to_string(),
    })
}

/// Field declared twice without `$overwrite$`.
#[cold]
pub fn duplicate_field(class: &str, field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateField {
        class: class.to_string(),
        field: field.to_string(),
    })
}

/// Label declared twice.
#[cold]
pub fn duplicate_label(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateLabel {
        name: name.to_string(),
    })
}

// Structural

/// Bracket without its partner.
#[cold]
pub fn unmatched_bracket(delimiter: char) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnmatchedBracket { delimiter })
}

/// Block opener whose terminator never appears.
#[cold]
pub fn missing_terminator(opener: &str, terminator: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingTerminator {
        opener: opener.to_string(),
        terminator: terminator.to_string(),
    })
}

/// Block terminator with nothing open.
#[cold]
pub fn unexpected_terminator(terminator: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnexpectedTerminator {
        terminator: terminator.to_string(),
    })
}

// Arithmetic

/// Division (or remainder) by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

// Runtime

/// The configured step budget ran out.
#[cold]
pub fn step_limit_exceeded(limit: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StepLimitExceeded { limit })
}

#[cfg(test)]
mod tests;
