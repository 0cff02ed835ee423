//! Named value converters applied to captures before binding.
//!
//! An operation declares `InputSpec::Converted(n, "to_number")` and receives
//! the converted `Value` instead of raw text. A rejected capture becomes a
//! binding error at the captured span.

use crate::value::LiteralParser;
use crate::Value;

/// Converter from captured text to a value; `Err` carries the reason.
pub type ConverterFn = fn(&str) -> Result<Value, String>;

/// Every converter name `converter` accepts.
pub const CONVERTER_NAMES: &[&str] = &["to_number", "to_text", "length"];

/// Look up a converter by name.
pub fn converter(name: &str) -> Option<ConverterFn> {
    match name {
        "to_number" => Some(to_number),
        "to_text" => Some(to_text),
        "length" => Some(length),
        _ => None,
    }
}

fn to_number(text: &str) -> Result<Value, String> {
    match LiteralParser::new().infer(text) {
        Ok(Some(Value::Number(n))) => Ok(Value::number(n)),
        _ => Err(format!("`{}` is not a number", text.trim())),
    }
}

/// Quoted text loses its quotes; anything else is kept verbatim.
fn to_text(text: &str) -> Result<Value, String> {
    let text = text.trim();
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    Ok(Value::text(inner))
}

/// Character count of the text form.
fn length(text: &str) -> Result<Value, String> {
    let Value::Text(text) = to_text(text)? else {
        return Err("expected text".to_string());
    };
    let count = text.chars().count();
    let count = u32::try_from(count).map_err(|_| format!("{count} characters is too long"))?;
    Ok(Value::number(f64::from(count)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::format_number;

    fn convert(name: &str, text: &str) -> Result<Value, String> {
        converter(name).map_or_else(|| Err(format!("no converter {name}")), |f| f(text))
    }

    #[test]
    fn test_every_listed_converter_exists() {
        for name in CONVERTER_NAMES {
            assert!(converter(name).is_some(), "{name}");
        }
        assert!(converter("to_date").is_none());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(convert("to_number", "10"), Ok(Value::number(10.0)));
        assert_eq!(convert("to_number", " 2.5 "), Ok(Value::number(2.5)));
        assert!(convert("to_number", "ten").is_err());
    }

    #[test]
    fn test_to_text_strips_quotes() {
        assert_eq!(convert("to_text", "\"hi\""), Ok(Value::text("hi")));
        assert_eq!(convert("to_text", "raw words"), Ok(Value::text("raw words")));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(convert("length", "\"héllo\""), Ok(Value::number(5.0)));
        assert_eq!(convert("length", "abc"), Ok(Value::number(3.0)));
        assert_eq!(
            convert("length", "").map(|v| format_number(v.as_number().unwrap_or(-1.0))),
            Ok("0".to_string())
        );
    }
}
