//! Core diagnostic types for structured error reporting.
//!
//! Defines [`Diagnostic`], [`Label`], [`Severity`] and [`SourceLine`], the
//! building blocks the dispatcher and the CLI use to report failures.

use std::fmt;

use tally_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// The statement a diagnostic points into.
///
/// Statements are rendered individually, so spans in labels are byte offsets
/// into `text`, not into the original file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLine {
    /// 1-based statement number.
    pub number: usize,
    /// The normalized statement text.
    pub text: String,
}

impl SourceLine {
    /// Create source info for statement `number` (1-based).
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        SourceLine {
            number,
            text: text.into(),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    /// The location to highlight.
    pub span: Span,
    /// The label text explaining this location.
    pub message: String,
    /// Whether this is the primary error location.
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the main error location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A rich diagnostic with all context needed for a fatal-error report.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// The failing statement, when known.
    pub source: Option<SourceLine>,
    /// Labeled spans showing where the error occurred.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Text suggestions for fixing the error.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            source: None,
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the failing statement.
    pub fn with_source(mut self, source: SourceLine) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        if let Some(ref source) = self.source {
            write!(f, "\n  --> line {}: {}", source.number, source.text)?;
        }

        for label in &self.labels {
            let marker = if label.is_primary { "^^^" } else { "---" };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

/// Create a "no matching operation" diagnostic.
///
/// `matched` is the byte length of the longest prefix some operation pattern
/// accepted; zero means nothing matched at all.
pub fn no_matching_operation(statement: &str, matched: usize) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::E1001);
    if matched > 0 && matched < statement.len() {
        let (head, rest) = statement.split_at(matched);
        diag.with_message(format!("{head} Invalid token \"{rest}\""))
            .with_label(
                Span::from_range(matched..statement.len()),
                "not understood by any operation",
            )
            .with_secondary_label(Span::from_range(0..matched), "recognized up to here")
    } else {
        diag.with_message(format!("Invalid token: \"{statement}\""))
            .with_label(Span::covering(statement), "no operation matches this statement")
    }
}

/// Create an "unclosed delimiter" diagnostic.
pub fn unclosed_delimiter(open_span: Span, delimiter: char) -> Diagnostic {
    let expected = match delimiter {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        _ => delimiter,
    };
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("unclosed delimiter `{delimiter}`"))
        .with_label(open_span, format!("expected a matching `{expected}`"))
}

/// Create a "duplicate definition" diagnostic for labels, classes or fields.
pub fn duplicate_definition(code: ErrorCode, kind: &str, name: &str) -> Diagnostic {
    Diagnostic::error(code).with_message(format!("{kind} `{name}` is already defined"))
}
