//! Runtime values for the Tally interpreter.
//!
//! `Value` is a closed set of variants. Scalars are stored inline; arrays,
//! maps and instances live behind a [`Shared`] handle whose constructor is
//! private to this module, so every container goes through a `Value::`
//! factory method.
//!
//! ```text
//! let list = Value::array(vec![Value::number(1.0)]);  // OK
//! let list = Value::Array(Shared::new(vec![]));       // ERROR: Shared::new is pub(super)
//! ```

mod class;
mod literal;
mod map;
mod ops;
mod shared;

use std::fmt;
use std::mem;
use std::rc::Rc;

pub use class::{ClassDefinition, ClassInstance, MethodFn, TYPE_FIELD};
pub use literal::{
    apply_type, binary_digits, decode_binary, is_binary_digits, split_top_level, LiteralParser,
};
pub use map::MapValue;
pub use ops::{apply_binary, loose_equals};
pub use shared::Shared;

use crate::errors::{type_mismatch, EvalError};

/// Nesting depth after which display output is elided.
const MAX_DISPLAY_DEPTH: usize = 32;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// All numbers are `f64`.
    Number(f64),
    Text(String),
    Boolean(bool),
    Array(Shared<Vec<Value>>),
    Map(Shared<MapValue>),
    /// A class used as a value (e.g. a field declared `as class`).
    ClassRef(Rc<ClassDefinition>),
    Instance(Shared<ClassInstance>),
    Null,
}

impl Value {
    // Factories

    #[inline]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    #[inline]
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    #[inline]
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }

    pub fn map(map: MapValue) -> Self {
        Value::Map(Shared::new(map))
    }

    pub fn class_ref(class: Rc<ClassDefinition>) -> Self {
        Value::ClassRef(class)
    }

    pub fn instance(instance: ClassInstance) -> Self {
        Value::Instance(Shared::new(instance))
    }

    // Inspection

    /// Variant name used in error messages and `as` type checks.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::ClassRef(_) => "class",
            Value::Instance(_) => "instance",
            Value::Null => "null",
        }
    }

    /// Type name including the class for instances (`instance of Pet`).
    pub fn describe_type(&self) -> String {
        match self {
            Value::Instance(inst) => format!("instance of {}", inst.borrow().class_name()),
            Value::ClassRef(class) => format!("class {}", class.name()),
            other => other.type_name().to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether both values have the same variant (payloads ignored).
    pub fn same_variant(&self, other: &Value) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    // Coercions

    /// Numeric view: numbers, or text that parses as a number.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) => {
                literal::parse_number(s.trim()).ok_or_else(|| type_mismatch("number", "text"))
            }
            other => Err(type_mismatch("number", other.type_name())),
        }
    }

    /// Integer view for bitwise operators; fractional parts are truncated.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bitwise operators work on the integral part by definition"
    )]
    pub fn as_integer(&self) -> Result<i64, EvalError> {
        let n = self.as_number()?;
        if n.is_finite() {
            Ok(n.trunc() as i64)
        } else {
            Err(type_mismatch("integer", "non-finite number"))
        }
    }

    /// Boolean view: booleans, `"true"`/`"false"` text, or numbers (non-zero).
    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Number(n) => Ok(*n != 0.0),
            Value::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(type_mismatch("boolean", other.type_name())),
        }
    }

    /// Text view; never fails.
    pub fn as_text(&self) -> String {
        self.display_value()
    }

    /// Element view: array items, or map values in order.
    pub fn as_list(&self) -> Result<Vec<Value>, EvalError> {
        match self {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::Map(map) => Ok(map.borrow().values().cloned().collect()),
            other => Err(type_mismatch("array", other.type_name())),
        }
    }

    /// Convert `self` to the variant of `template`, for writes that must not
    /// change a variable's variant.
    pub fn coerce_like(self, template: &Value) -> Result<Value, EvalError> {
        match template {
            Value::Number(_) => Ok(Value::Number(self.as_number()?)),
            Value::Text(_) => Ok(Value::Text(self.as_text())),
            Value::Boolean(_) => Ok(Value::Boolean(self.as_bool()?)),
            _ if self.same_variant(template) => Ok(self),
            _ => Err(type_mismatch(template.type_name(), self.type_name())),
        }
    }

    /// Copy with fresh containers all the way down.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Array(items) => {
                Value::array(items.borrow().iter().map(Value::deep_copy).collect())
            }
            Value::Map(map) => Value::map(map.borrow().deep_copy()),
            Value::Instance(inst) => Value::instance(inst.borrow().deep_copy()),
            other => other.clone(),
        }
    }

    // Display

    /// Display form for `print`/`get` output. Top-level text is unquoted.
    pub fn display_value(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn write_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if depth > MAX_DISPLAY_DEPTH {
            return f.write_str("...");
        }
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_nested(f, depth + 1)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                write_entries(f, &map.borrow(), depth)?;
                f.write_str("}")
            }
            Value::ClassRef(class) => write!(f, "class {}", class.name()),
            Value::Instance(inst) => {
                let inst = inst.borrow();
                write!(f, "{} {{", inst.class_name())?;
                write_entries(f, inst.fields(), depth)?;
                f.write_str("}")
            }
            Value::Null => f.write_str("null"),
        }
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, map: &MapValue, depth: usize) -> fmt::Result {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key}: ")?;
        value.write_nested(f, depth + 1)?;
    }
    Ok(())
}

/// Integral values print without a fractional part (`4`, not `4.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_nested(f, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n:?})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Null => write!(f, "Null"),
            other => write!(f, "{}({other})", other.type_name()),
        }
    }
}

/// Structural equality. Instances compare by identity, classes by name.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::ClassRef(a), Value::ClassRef(b)) => a.name() == b.name(),
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
