//! Literal parsing and type-name directed casts.
//!
//! Inference order for a literal's text: array `[…]`, map `{…}`, number,
//! quoted text, then `true`/`false`/`null`. Anything else is not a literal;
//! callers fall back to expression evaluation.
//!
//! Inside array and map literals a bare identifier (or member path) is
//! resolved through the optional resolver, so `[member1, member2]` builds an
//! array of the two variables' values.

use super::{MapValue, Value};
use crate::errors::{malformed_literal, type_mismatch, undefined_variable, EvalError, EvalResult};

/// Resolver for identifiers appearing inside container literals.
pub type Resolver<'r> = &'r dyn Fn(&str) -> EvalResult;

/// Parser for literal text.
#[derive(Default)]
pub struct LiteralParser<'r> {
    resolve: Option<Resolver<'r>>,
}

impl<'r> LiteralParser<'r> {
    /// Parser that rejects identifiers inside literals.
    pub fn new() -> Self {
        LiteralParser { resolve: None }
    }

    /// Parser that resolves identifiers inside literals through `resolve`.
    pub fn with_resolver(resolve: Resolver<'r>) -> Self {
        LiteralParser {
            resolve: Some(resolve),
        }
    }

    /// Infer a value from literal text.
    ///
    /// Returns `Ok(None)` when the text is not a literal at all, and an error
    /// when it starts like a container literal but is malformed.
    pub fn infer(&self, text: &str) -> Result<Option<Value>, EvalError> {
        let text = text.trim();
        if text.starts_with('[') && text.ends_with(']') {
            return self.parse_array(text).map(Some);
        }
        if text.starts_with('{') && text.ends_with('}') {
            return self.parse_map(text).map(Some);
        }
        if let Some(n) = parse_number(text) {
            return Ok(Some(Value::number(n)));
        }
        if let Some(inner) = quoted(text) {
            return Ok(Some(Value::text(inner)));
        }
        Ok(match text {
            "true" => Some(Value::boolean(true)),
            "false" => Some(Value::boolean(false)),
            "null" => Some(Value::Null),
            _ => None,
        })
    }

    fn element(&self, text: &str) -> EvalResult {
        if let Some(value) = self.infer(text)? {
            return Ok(value);
        }
        if !is_path(text) {
            return Err(malformed_literal(text, "cannot determine the type of this value"));
        }
        match self.resolve {
            Some(resolve) => resolve(text),
            None => Err(undefined_variable(text)),
        }
    }

    fn parse_array(&self, text: &str) -> EvalResult {
        let inner = text[1..text.len() - 1].trim();
        if inner.is_empty() {
            return Ok(Value::array(Vec::new()));
        }
        let items = split_top_level(inner, ',')
            .ok_or_else(|| malformed_literal(text, "unbalanced brackets or quotes"))?
            .into_iter()
            .map(|item| {
                if item.is_empty() {
                    Err(malformed_literal(text, "empty array element"))
                } else {
                    self.element(item)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(items))
    }

    fn parse_map(&self, text: &str) -> EvalResult {
        let inner = text[1..text.len() - 1].trim();
        let mut map = MapValue::new();
        if inner.is_empty() {
            return Ok(Value::map(map));
        }
        let entries = split_top_level(inner, ',')
            .ok_or_else(|| malformed_literal(text, "unbalanced brackets or quotes"))?;
        for entry in entries {
            let (key, value) = split_once_top_level(entry, ':')
                .ok_or_else(|| malformed_literal(entry, "map entries are `key: value`"))?;
            let key = key.trim();
            let key = match quoted(key) {
                Some(inner) => inner.to_string(),
                None if is_identifier(key) => key.to_string(),
                None => return Err(malformed_literal(key, "map keys must be identifiers")),
            };
            map.insert(key, self.element(value.trim())?);
        }
        Ok(Value::map(map))
    }
}

/// Parse `-?digits(.digits)?`. Rejects exponents, `inf` and `NaN`.
pub(super) fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || frac.is_some_and(|f| !digits(f)) {
        return None;
    }
    text.parse().ok()
}

/// Contents of a `"…"` literal with no inner quotes.
fn quoted(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.contains('"')).then_some(inner)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Identifier optionally followed by `->`, `.`, `[…]` or `()` segments.
fn is_path(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_->.[]()".contains(c))
}

/// Whether `text` is a non-empty run of `0`/`1`.
pub fn is_binary_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b == b'0' || b == b'1')
}

/// The digits of a binary literal written bare (`0101`) or quoted
/// (`"0101"`).
pub fn binary_digits(text: &str) -> Option<&str> {
    let text = text.trim();
    let digits = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    is_binary_digits(digits).then_some(digits)
}

/// Decode binary digits: a multiple of 8 digits becomes an array of byte
/// values, anything else a single integer.
pub fn decode_binary(digits: &str) -> EvalResult {
    if !is_binary_digits(digits) {
        return Err(malformed_literal(digits, "binary literals contain only 0 and 1"));
    }
    if digits.len() % 8 == 0 {
        let bytes = digits
            .as_bytes()
            .chunks(8)
            .map(|chunk| {
                let byte = chunk
                    .iter()
                    .fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit == b'1'));
                Value::number(f64::from(byte))
            })
            .collect();
        return Ok(Value::array(bytes));
    }
    let n = u64::from_str_radix(digits, 2)
        .map_err(|_| malformed_literal(digits, "binary literal does not fit in 64 bits"))?;
    #[expect(
        clippy::cast_precision_loss,
        reason = "numbers are f64 throughout the language"
    )]
    let n = n as f64;
    Ok(Value::number(n))
}

/// Validate `value` against a type name and convert it.
///
/// Type names: `object` (anything), `int`, `double`/`number`,
/// `string`/`text`, `bool`/`boolean`, `binary`, `array`, `map`, `class`, and
/// `[T]` for arrays whose elements all satisfy `T`.
pub fn apply_type(value: Value, type_name: &str) -> EvalResult {
    let ty = type_name.trim();
    if let Some(inner) = ty.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let Value::Array(items) = &value else {
            return Err(type_mismatch(ty, value.type_name()));
        };
        let converted = items
            .borrow()
            .iter()
            .map(|item| apply_type(item.clone(), inner))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::array(converted));
    }

    match ty.to_ascii_lowercase().as_str() {
        "object" => Ok(value),
        "int" => {
            let n = value
                .as_number()
                .map_err(|_| type_mismatch("int", value.type_name()))?;
            if n.fract() == 0.0 {
                Ok(Value::number(n))
            } else {
                Err(type_mismatch("int", "fractional number"))
            }
        }
        "double" | "number" => value
            .as_number()
            .map(Value::number)
            .map_err(|_| type_mismatch(ty, value.type_name())),
        "string" | "text" => match value {
            Value::Number(_) | Value::Text(_) | Value::Boolean(_) | Value::Null => {
                Ok(Value::text(value.as_text()))
            }
            other => Err(type_mismatch("string", other.type_name())),
        },
        "bool" | "boolean" => value
            .as_bool()
            .map(Value::boolean)
            .map_err(|_| type_mismatch(ty, value.type_name())),
        "binary" => match &value {
            Value::Text(digits) if is_binary_digits(digits) => decode_binary(digits),
            other => Err(type_mismatch("binary", other.type_name())),
        },
        "array" => expect_variant(value, "array", |v| matches!(v, Value::Array(_))),
        "map" => expect_variant(value, "map", |v| matches!(v, Value::Map(_))),
        "class" => expect_variant(value, "class", |v| {
            matches!(v, Value::ClassRef(_) | Value::Instance(_))
        }),
        _ => Err(EvalError::new(format!("unknown type `{ty}`"))),
    }
}

fn expect_variant(value: Value, expected: &str, accepts: fn(&Value) -> bool) -> EvalResult {
    if accepts(&value) {
        Ok(value)
    } else {
        Err(type_mismatch(expected, value.type_name()))
    }
}

/// Split on `sep` outside quotes and brackets. `None` if unbalanced.
///
/// Parts are trimmed; `"a, [b, c]"` split on `,` gives `["a", "[b, c]"]`.
pub fn split_top_level(text: &str, sep: char) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = find_top_level(rest, sep)? {
        parts.push(rest[..pos].trim());
        rest = &rest[pos + sep.len_utf8()..];
    }
    parts.push(rest.trim());
    Some(parts)
}

fn split_once_top_level(text: &str, sep: char) -> Option<(&str, &str)> {
    let pos = find_top_level(text, sep)??;
    Some((&text[..pos], &text[pos + sep.len_utf8()..]))
}

/// Byte offset of the first `sep` outside quotes and brackets.
///
/// The outer `None` means the text is unbalanced; the inner one that no
/// separator occurs.
fn find_top_level(text: &str, sep: char) -> Option<Option<usize>> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            c if c == sep && depth == 0 => return Some(Some(i)),
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0 && !in_quotes).then_some(None)
}
