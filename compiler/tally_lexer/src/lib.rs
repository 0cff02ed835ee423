//! Tokenizer for Tally inline expressions.
//!
//! Expressions appear on the right of assignments, in `IF`/`FOR` conditions
//! and in `print` arguments. The lexer only splits text into tokens; bracket
//! balance is checked separately by [`check_balance`] so the evaluator can
//! report the offending bracket.

mod token;

use logos::Logos;
use tally_ir::{BinaryOp, Span};

pub use token::{Delimiter, Token, TokenKind};

/// Raw token from logos (before conversion).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""[^"]*""#)]
    Text,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("is")]
    Is,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    #[token("<")]
    Lt,
    #[token(">>")]
    #[token(">")]
    Gt,
    #[token("=")]
    Setter,

    // Brackets
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(
        r"[A-Za-z_][A-Za-z0-9_]*(->[A-Za-z_][A-Za-z0-9_]*(\(\))?|\.[A-Za-z_][A-Za-z0-9_]*(\(\))?|\[[A-Za-z0-9_]+\])*"
    )]
    Identifier,
}

/// Errors produced while tokenizing or bracket-checking an expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{text}` at {span}")]
    UnexpectedCharacter { text: String, span: Span },
    #[error("unterminated string starting at {span}")]
    UnterminatedString { span: Span },
    #[error("unmatched closing `{delimiter}` at {span}")]
    UnmatchedClose { delimiter: char, span: Span },
    #[error("unclosed `{delimiter}` opened at {span}")]
    UnclosedOpen { delimiter: char, span: Span },
    #[error("empty expression")]
    Empty,
}

impl LexError {
    /// Location of the error in the expression text, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnmatchedClose { span, .. }
            | LexError::UnclosedOpen { span, .. } => Some(*span),
            LexError::Empty => None,
        }
    }

    /// Whether this is a bracket balance failure.
    pub fn is_bracket_error(&self) -> bool {
        matches!(
            self,
            LexError::UnmatchedClose { .. } | LexError::UnclosedOpen { .. }
        )
    }
}

/// Tokenize an expression.
///
/// Fails on the first character no token accepts. An empty (or
/// whitespace-only) expression is an error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();
        match result {
            Ok(raw) => tokens.push(Token::new(convert_token(raw, slice), span)),
            Err(()) if slice.starts_with('"') => {
                return Err(LexError::UnterminatedString { span });
            }
            Err(()) => {
                return Err(LexError::UnexpectedCharacter {
                    text: slice.to_string(),
                    span,
                });
            }
        }
    }

    if tokens.is_empty() {
        return Err(LexError::Empty);
    }
    Ok(tokens)
}

/// Tokenize and verify that every bracket is closed by its own kind.
pub fn tokenize_balanced(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = tokenize(source)?;
    check_balance(&tokens)?;
    Ok(tokens)
}

/// Verify bracket balance over a token stream.
pub fn check_balance(tokens: &[Token]) -> Result<(), LexError> {
    let mut stack: Vec<(Delimiter, Span)> = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::Open(delim) => stack.push((delim, token.span)),
            TokenKind::Close(delim) => match stack.pop() {
                Some((open, _)) if open == delim => {}
                _ => {
                    return Err(LexError::UnmatchedClose {
                        delimiter: delim.close_char(),
                        span: token.span,
                    })
                }
            },
            _ => {}
        }
    }
    match stack.pop() {
        Some((delim, span)) => Err(LexError::UnclosedOpen {
            delimiter: delim.open_char(),
            span,
        }),
        None => Ok(()),
    }
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::Text => TokenKind::Text(slice[1..slice.len() - 1].to_string()),
        RawToken::True => TokenKind::Bool(true),
        RawToken::False => TokenKind::Bool(false),
        RawToken::Null => TokenKind::Null,

        RawToken::Plus => TokenKind::Operator(BinaryOp::Add),
        RawToken::Minus => TokenKind::Operator(BinaryOp::Sub),
        RawToken::Star => TokenKind::Operator(BinaryOp::Mul),
        RawToken::Slash => TokenKind::Operator(BinaryOp::Div),
        RawToken::Percent => TokenKind::Operator(BinaryOp::Mod),
        RawToken::Amp => TokenKind::Operator(BinaryOp::BitAnd),
        RawToken::Pipe => TokenKind::Operator(BinaryOp::BitOr),
        RawToken::AmpAmp => TokenKind::Operator(BinaryOp::And),
        RawToken::PipePipe => TokenKind::Operator(BinaryOp::Or),
        RawToken::EqEq | RawToken::Is => TokenKind::Operator(BinaryOp::Eq),
        RawToken::NotEq => TokenKind::Operator(BinaryOp::NotEq),
        RawToken::LtEq => TokenKind::Operator(BinaryOp::LtEq),
        RawToken::GtEq => TokenKind::Operator(BinaryOp::GtEq),
        RawToken::Lt => TokenKind::Operator(BinaryOp::Lt),
        RawToken::Gt => TokenKind::Operator(BinaryOp::Gt),
        RawToken::Setter => TokenKind::Setter,

        RawToken::LParen => TokenKind::Open(Delimiter::Paren),
        RawToken::RParen => TokenKind::Close(Delimiter::Paren),
        RawToken::LBracket => TokenKind::Open(Delimiter::Bracket),
        RawToken::RBracket => TokenKind::Close(Delimiter::Bracket),
        RawToken::LBrace => TokenKind::Open(Delimiter::Brace),
        RawToken::RBrace => TokenKind::Close(Delimiter::Brace),

        RawToken::Identifier => TokenKind::Identifier(slice.to_string()),
    }
}
