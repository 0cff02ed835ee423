//! Variable paths: `root`, then any chain of `->field`, `.field`,
//! `.method()` and `[index]` segments.
//!
//! Containers are shared handles, so writing through a path mutates the
//! container in place and every other path reaching it sees the change.

use smallvec::SmallVec;
use tally_patterns::{
    index_out_of_range, malformed_expression, no_such_member, not_indexable, null_reference,
    type_mismatch, unmatched_bracket, EvalError, EvalResult, Value,
};

/// One step after the root of a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// `->name` or `.name`
    Field(String),
    /// `->name()` or `.name()`: zero-argument method call.
    Method(String),
    /// `[…]`
    Index(IndexKey),
}

/// Contents of an `[…]` segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexKey {
    /// `[2]`
    Position(usize),
    /// `["key"]`
    Key(String),
    /// `[i]`: a variable's value when it exists, else the literal map key.
    Name(String),
}

/// A parsed variable path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarPath {
    pub root: String,
    pub segments: SmallVec<[PathSegment; 4]>,
}

impl VarPath {
    pub fn parse(text: &str) -> Result<VarPath, EvalError> {
        let text = text.trim();
        let bad = || malformed_expression(format!("`{text}` is not a variable path"));
        let (root, mut rest) = take_identifier(text).ok_or_else(bad)?;

        let mut segments = SmallVec::new();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            if let Some(after) = rest.strip_prefix("->").or_else(|| rest.strip_prefix('.')) {
                let (name, after) = take_identifier(after.trim_start()).ok_or_else(bad)?;
                let name = name.to_string();
                let (segment, after) = match after.strip_prefix("()") {
                    Some(after) => (PathSegment::Method(name), after),
                    None => (PathSegment::Field(name), after),
                };
                segments.push(segment);
                rest = after;
            } else if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| unmatched_bracket('['))?;
                let key = index_key(after[..close].trim()).ok_or_else(bad)?;
                segments.push(PathSegment::Index(key));
                rest = &after[close + 1..];
            } else {
                return Err(bad());
            }
        }

        Ok(VarPath {
            root: root.to_string(),
            segments,
        })
    }

    /// A bare variable name with no segments.
    pub fn is_plain(&self) -> bool {
        self.segments.is_empty()
    }
}

fn take_identifier(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    Some(text.split_at(end))
}

fn index_key(inner: &str) -> Option<IndexKey> {
    if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        return inner.parse().ok().map(IndexKey::Position);
    }
    if let Some(key) = inner.strip_prefix('"').and_then(|k| k.strip_suffix('"')) {
        return Some(IndexKey::Key(key.to_string()));
    }
    match take_identifier(inner) {
        Some((name, "")) => Some(IndexKey::Name(name.to_string())),
        _ => None,
    }
}

/// Resolves variables named inside `[…]`.
pub type IndexLookup<'a> = &'a dyn Fn(&str) -> Option<Value>;

/// An index after variable resolution.
enum Slot {
    Position(i64),
    Key(String),
}

fn resolve_slot(key: &IndexKey, lookup: IndexLookup<'_>) -> Result<Slot, EvalError> {
    match key {
        IndexKey::Position(n) => Ok(Slot::Position(i64::try_from(*n).unwrap_or(i64::MAX))),
        IndexKey::Key(key) => Ok(Slot::Key(key.clone())),
        IndexKey::Name(name) => match lookup(name) {
            Some(Value::Number(n)) => position(n),
            Some(Value::Text(key)) => Ok(Slot::Key(key)),
            Some(other) => Err(type_mismatch("number or text index", other.type_name())),
            None => Ok(Slot::Key(name.clone())),
        },
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "checked to be integral and finite before the cast"
)]
fn position(n: f64) -> Result<Slot, EvalError> {
    if n.is_finite() && n.fract() == 0.0 {
        Ok(Slot::Position(n as i64))
    } else {
        Err(type_mismatch("integer index", "fractional number"))
    }
}

/// Array slot for `index`, if in range.
fn array_slot(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_range(index, len))
}

/// Follow `segments` starting at `value`.
pub fn walk(mut value: Value, segments: &[PathSegment], lookup: IndexLookup<'_>) -> EvalResult {
    for segment in segments {
        value = step(&value, segment, lookup)?;
    }
    Ok(value)
}

fn step(value: &Value, segment: &PathSegment, lookup: IndexLookup<'_>) -> EvalResult {
    match segment {
        PathSegment::Field(name) => field(value, name),
        PathSegment::Method(name) => match value {
            Value::Instance(instance) => instance.borrow().call_method(name, &[]),
            Value::Null => Err(null_reference(&format!("{name}()"))),
            other => Err(no_such_member(other.type_name(), &format!("{name}()"))),
        },
        PathSegment::Index(key) => index(value, resolve_slot(key, lookup)?),
    }
}

fn field(value: &Value, name: &str) -> EvalResult {
    match value {
        Value::Instance(instance) => instance.borrow().field(name),
        Value::Map(map) => map
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| no_such_member("map", name)),
        Value::Null => Err(null_reference(name)),
        other => Err(no_such_member(other.type_name(), name)),
    }
}

fn index(value: &Value, slot: Slot) -> EvalResult {
    match (value, slot) {
        (Value::Array(items), Slot::Position(i)) => {
            let items = items.borrow();
            let at = array_slot(i, items.len())?;
            Ok(items[at].clone())
        }
        (Value::Map(map), Slot::Position(i)) => {
            let map = map.borrow();
            let at = array_slot(i, map.len())?;
            map.entry_at(at)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| index_out_of_range(i, map.len()))
        }
        (Value::Text(text), Slot::Position(i)) => {
            let len = text.chars().count();
            let at = array_slot(i, len)?;
            Ok(text
                .chars()
                .nth(at)
                .map_or(Value::Null, Value::text))
        }
        (Value::Map(_) | Value::Instance(_), Slot::Key(key)) => field(value, &key),
        (Value::Array(_), Slot::Key(_)) => Err(type_mismatch("integer index", "text")),
        (Value::Null, _) => Err(null_reference("[]")),
        (other, _) => Err(not_indexable(other.type_name())),
    }
}

/// Write `value` into `container` at the final segment of a path.
pub fn write(
    container: &Value,
    last: &PathSegment,
    value: Value,
    lookup: IndexLookup<'_>,
) -> Result<(), EvalError> {
    match last {
        PathSegment::Field(name) => write_field(container, name, value),
        PathSegment::Method(name) => Err(malformed_expression(format!(
            "cannot assign to the method call `{name}()`"
        ))),
        PathSegment::Index(key) => match (container, resolve_slot(key, lookup)?) {
            (Value::Array(items), Slot::Position(i)) => {
                let mut items = items.borrow_mut();
                let at = array_slot(i, items.len())?;
                items[at] = value;
                Ok(())
            }
            (Value::Map(map), Slot::Position(i)) => {
                let key = {
                    let map = map.borrow();
                    let at = array_slot(i, map.len())?;
                    map.entry_at(at).map(|(k, _)| k.to_string())
                };
                match key {
                    Some(key) => {
                        map.borrow_mut().insert(key, value);
                        Ok(())
                    }
                    None => Err(index_out_of_range(i, map.borrow().len())),
                }
            }
            (Value::Map(_) | Value::Instance(_), Slot::Key(key)) => {
                write_field(container, &key, value)
            }
            (Value::Array(_), Slot::Key(_)) => Err(type_mismatch("integer index", "text")),
            (Value::Null, _) => Err(null_reference("[]")),
            (other, _) => Err(not_indexable(other.type_name())),
        },
    }
}

fn write_field(container: &Value, name: &str, value: Value) -> Result<(), EvalError> {
    match container {
        Value::Instance(instance) => instance.borrow_mut().set_field(name, value),
        Value::Map(map) => {
            map.borrow_mut().insert(name, value);
            Ok(())
        }
        Value::Null => Err(null_reference(name)),
        other => Err(no_such_member(other.type_name(), name)),
    }
}
