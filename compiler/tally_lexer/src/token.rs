//! Token types for inline expressions.

use std::fmt;

use tally_ir::{BinaryOp, Span};

/// A token with its span in the expression text.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The operator carried by an `Operator` token.
    pub fn op(&self) -> Option<BinaryOp> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Bracket pairs: `()`, `[]`, `{}`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub fn open_char(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

/// Token kinds of the expression language.
#[derive(Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal: `42`, `2.5`
    Number(f64),
    /// Quoted text, without the quotes: `"hi"`
    Text(String),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// Binary operator, including the `<<`, `>>` and `is` spellings.
    Operator(BinaryOp),
    /// `=` following a comparison operand (conditional assignment).
    Setter,
    /// Opening bracket.
    Open(Delimiter),
    /// Closing bracket.
    Close(Delimiter),
    /// Identifier with optional member/index chain: `pet->age`, `list[2]`, `a.b`
    Identifier(String),
}

impl TokenKind {
    /// Text used when rendering the token back for error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Text(s) => format!("\"{s}\""),
            TokenKind::Bool(b) => b.to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Operator(op) => op.as_symbol().to_string(),
            TokenKind::Setter => "=".to_string(),
            TokenKind::Open(d) => d.open_char().to_string(),
            TokenKind::Close(d) => d.close_char().to_string(),
            TokenKind::Identifier(name) => name.clone(),
        }
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "Number({n})"),
            TokenKind::Text(s) => write!(f, "Text({s:?})"),
            TokenKind::Bool(b) => write!(f, "Bool({b})"),
            TokenKind::Null => write!(f, "Null"),
            TokenKind::Operator(op) => write!(f, "Operator({})", op.as_symbol()),
            TokenKind::Setter => write!(f, "Setter"),
            TokenKind::Open(d) => write!(f, "Open({})", d.open_char()),
            TokenKind::Close(d) => write!(f, "Close({})", d.close_char()),
            TokenKind::Identifier(name) => write!(f, "Identifier({name})"),
        }
    }
}
