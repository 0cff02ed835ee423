//! Inline expression evaluator.
//!
//! Operators apply strictly left to right with no precedence:
//! `2 + 2 * (22)` is `(2 + 2) * 22 = 88`. Bracketed groups are evaluated
//! first and then act as a single operand. An expression that is a whole
//! `[…]` or `{…}` literal is parsed as an array or map.
//!
//! A comparison followed by `= value` is a conditional assignment: when the
//! comparison is true and its left operand came straight from a variable
//! path, the value is written back to that path, converted to the
//! variable's current variant.
//!
//! ```text
//! n < 10 = 10     // n becomes 10 only if it was below 10
//! ```

use tally_ir::{BinaryOp, Span};
use tally_lexer::{tokenize_balanced, Delimiter, LexError, Token, TokenKind};
use tally_patterns::{
    apply_binary, malformed_expression, malformed_literal, type_mismatch, unmatched_bracket,
    EvalError, EvalResult, LiteralParser, Value,
};
use tracing::trace;

/// Name resolution for the evaluator.
pub trait Scope {
    /// Value at a variable path such as `pet->tags[0]`.
    fn resolve(&self, path: &str) -> EvalResult;

    /// Write a conditional-assignment result back to `path`.
    fn assign(&mut self, path: &str, value: Value) -> Result<(), EvalError>;
}

/// An operand together with the variable path it was read from.
struct Operand<'t> {
    value: Value,
    source: Option<&'t str>,
}

/// Evaluates one expression against a [`Scope`].
pub struct Evaluator<'a, S: Scope + ?Sized> {
    source: &'a str,
    scope: &'a mut S,
}

impl<'a, S: Scope + ?Sized> Evaluator<'a, S> {
    pub fn new(source: &'a str, scope: &'a mut S) -> Self {
        Evaluator { source, scope }
    }

    /// Tokenize, check bracket balance and evaluate. Error spans are byte
    /// offsets into the source text.
    pub fn evaluate(mut self) -> EvalResult {
        let text = self.source.trim();
        if text.starts_with(['[', '{']) {
            if let Some(value) = self.literal(text)? {
                return Ok(value);
            }
        }
        let tokens = tokenize_balanced(self.source).map_err(lex_error)?;
        self.sequence(&tokens, Span::covering(self.source))
    }

    /// Evaluate a run of `operand (op operand [= operand])*`.
    fn sequence(&mut self, tokens: &[Token], whole: Span) -> EvalResult {
        let mut pos = 0;
        let Some(first) = self.operand(tokens, &mut pos)? else {
            return Err(malformed_expression("expected a value").with_span(whole));
        };
        let mut left = first.value;
        let mut source = first.source;

        while let Some(token) = tokens.get(pos) {
            let Some(op) = token.op() else {
                return Err(malformed_expression(format!(
                    "expected an operator, found `{}`",
                    token.kind.display_name()
                ))
                .with_span(token.span));
            };
            pos += 1;
            let right = self.operand(tokens, &mut pos)?.ok_or_else(|| {
                malformed_expression(format!("`{}` needs a right-hand value", op.as_symbol()))
                    .with_span(token.span)
            })?;
            let result = apply_binary(op, &left, &right.value)
                .map_err(|err| err.with_span_if_absent(token.span))?;

            let setter = tokens
                .get(pos)
                .filter(|t| op.is_comparison() && t.kind == TokenKind::Setter)
                .map(|t| t.span);
            if let Some(setter) = setter {
                pos += 1;
                let assigned = self.operand(tokens, &mut pos)?.ok_or_else(|| {
                    malformed_expression("`=` needs a value to assign").with_span(setter)
                })?;
                if let (Value::Boolean(true), Some(path)) = (&result, source) {
                    self.conditional_assign(path, &left, assigned.value)
                        .map_err(|err| err.with_span_if_absent(setter))?;
                }
            }

            trace!(op = op.as_symbol(), result = %result, "step");
            left = result;
            source = None;
        }
        Ok(left)
    }

    fn conditional_assign(
        &mut self,
        path: &str,
        current: &Value,
        value: Value,
    ) -> Result<(), EvalError> {
        let value = value.coerce_like(current)?;
        trace!(path, value = %value, "conditional assignment");
        self.scope.assign(path, value)
    }

    /// Read one operand at `pos`; `None` at the end of the tokens.
    fn operand<'t>(
        &mut self,
        tokens: &'t [Token],
        pos: &mut usize,
    ) -> Result<Option<Operand<'t>>, EvalError> {
        let Some(token) = tokens.get(*pos) else {
            return Ok(None);
        };
        *pos += 1;
        let value = match &token.kind {
            TokenKind::Number(n) => Value::number(*n),
            TokenKind::Text(s) => Value::text(s.clone()),
            TokenKind::Bool(b) => Value::boolean(*b),
            TokenKind::Null => Value::Null,
            TokenKind::Identifier(path) => {
                let value = self
                    .scope
                    .resolve(path)
                    .map_err(|err| err.with_span_if_absent(token.span))?;
                return Ok(Some(Operand {
                    value,
                    source: Some(path.as_str()),
                }));
            }
            TokenKind::Operator(BinaryOp::Sub) => {
                let inner = self.operand(tokens, pos)?.ok_or_else(|| {
                    malformed_expression("`-` needs a value").with_span(token.span)
                })?;
                let n = inner.value.as_number().map_err(|_| {
                    type_mismatch("number", inner.value.type_name()).with_span(token.span)
                })?;
                Value::number(-n)
            }
            TokenKind::Open(delimiter) => {
                let open = *pos - 1;
                let close = matching_close(tokens, open).ok_or_else(|| {
                    unmatched_bracket(delimiter.open_char()).with_span(token.span)
                })?;
                let span = Span::new(token.span.start, tokens[close].span.end);
                *pos = close + 1;
                match delimiter {
                    Delimiter::Paren => self.group(&tokens[open + 1..close], span)?,
                    Delimiter::Bracket | Delimiter::Brace => self.container(span)?,
                }
            }
            other => {
                return Err(malformed_expression(format!(
                    "expected a value, found `{}`",
                    other.display_name()
                ))
                .with_span(token.span));
            }
        };
        Ok(Some(Operand {
            value,
            source: None,
        }))
    }

    /// A parenthesised sub-expression.
    #[tracing::instrument(level = "trace", skip_all, fields(span = %span))]
    fn group(&mut self, inner: &[Token], span: Span) -> EvalResult {
        if inner.is_empty() {
            return Err(malformed_expression("empty brackets").with_span(span));
        }
        self.sequence(inner, span)
    }

    /// An array or map literal, parsed from its source text.
    fn container(&self, span: Span) -> EvalResult {
        let text = &self.source[span.to_range()];
        self.literal(text)?
            .ok_or_else(|| malformed_literal(text, "not a container literal").with_span(span))
    }

    /// Literal inference with identifiers resolved through the scope.
    fn literal(&self, text: &str) -> Result<Option<Value>, EvalError> {
        let scope: &S = &*self.scope;
        let resolve = |path: &str| scope.resolve(path);
        LiteralParser::with_resolver(&resolve).infer(text)
    }
}

/// Index of the bracket closing the one at `open`.
fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Open(_) => depth += 1,
            TokenKind::Close(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn lex_error(err: LexError) -> EvalError {
    let span = err.span();
    let converted = match &err {
        LexError::UnmatchedClose { delimiter, .. } | LexError::UnclosedOpen { delimiter, .. } => {
            unmatched_bracket(*delimiter)
        }
        LexError::Empty => malformed_expression("empty expression"),
        LexError::UnexpectedCharacter { .. } | LexError::UnterminatedString { .. } => {
            malformed_expression(err.to_string())
        }
    };
    match span {
        Some(span) => converted.with_span(span),
        None => converted,
    }
}

/// Evaluate `source` against `scope`.
pub fn evaluate<S: Scope + ?Sized>(source: &str, scope: &mut S) -> EvalResult {
    Evaluator::new(source, scope).evaluate()
}

#[cfg(test)]
mod tests;
