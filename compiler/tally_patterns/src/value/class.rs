//! Class definitions and instances.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{MapValue, Value};
use crate::errors::{duplicate_field, no_such_member, no_such_method, EvalError, EvalResult};

/// Native method callable on an instance.
pub type MethodFn = fn(&ClassInstance, &[Value]) -> EvalResult;

/// Field every class gets, holding the class name.
pub const TYPE_FIELD: &str = "Type";

/// A class: field defaults plus a method table.
///
/// Built once when its `class … class:end` block runs and never mutated
/// afterwards; instances copy the defaults.
#[derive(Clone)]
pub struct ClassDefinition {
    name: String,
    fields: MapValue,
    methods: FxHashMap<String, MethodFn>,
}

impl ClassDefinition {
    /// Start a definition. The `Type` field is pre-populated.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut fields = MapValue::new();
        fields.insert(TYPE_FIELD, Value::text(name.clone()));
        ClassDefinition {
            name,
            fields,
            methods: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field defaults in declaration order.
    pub fn fields(&self) -> &MapValue {
        &self.fields
    }

    /// Add a field default; redefining needs `overwrite`.
    pub fn add_field(&mut self, field: &str, value: Value, overwrite: bool) -> Result<(), EvalError> {
        if self.fields.contains_key(field) && !overwrite {
            return Err(duplicate_field(&self.name, field));
        }
        self.fields.insert(field, value);
        Ok(())
    }

    /// Add a native method.
    pub fn add_method(&mut self, method: &str, func: MethodFn) -> Result<(), EvalError> {
        if self.methods.contains_key(method) {
            return Err(EvalError::new(format!(
                "method `{method}` is already defined in class `{}`",
                self.name
            )));
        }
        self.methods.insert(method.to_string(), func);
        Ok(())
    }

    /// Look up a method, falling back to the methods every instance has.
    pub fn method(&self, method: &str) -> Option<MethodFn> {
        self.methods
            .get(method)
            .copied()
            .or_else(|| builtin_method(method))
    }

    /// Names of class-specific methods, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create an instance owning a deep copy of the field defaults.
    pub fn instantiate(self: &Rc<Self>) -> ClassInstance {
        ClassInstance {
            class: Rc::clone(self),
            fields: self.fields.deep_copy(),
        }
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.method_names())
            .finish()
    }
}

/// A live instance with its own field values.
#[derive(Clone, Debug)]
pub struct ClassInstance {
    class: Rc<ClassDefinition>,
    fields: MapValue,
}

impl ClassInstance {
    pub fn class(&self) -> &Rc<ClassDefinition> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    pub fn fields(&self) -> &MapValue {
        &self.fields
    }

    /// Read a field.
    pub fn field(&self, field: &str) -> EvalResult {
        self.fields
            .get(field)
            .cloned()
            .ok_or_else(|| no_such_member(self.class.name(), field))
    }

    /// Overwrite an existing field. Instances cannot grow new fields.
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<(), EvalError> {
        if !self.fields.contains_key(field) {
            return Err(no_such_member(self.class.name(), field));
        }
        self.fields.insert(field, value);
        Ok(())
    }

    /// Invoke a method by name.
    pub fn call_method(&self, method: &str, args: &[Value]) -> EvalResult {
        let func = self
            .class
            .method(method)
            .ok_or_else(|| no_such_method(self.class.name(), method))?;
        func(self, args)
    }

    /// Deep copy of this instance (fresh containers, same class).
    pub fn deep_copy(&self) -> ClassInstance {
        ClassInstance {
            class: Rc::clone(&self.class),
            fields: self.fields.deep_copy(),
        }
    }
}

fn builtin_method(method: &str) -> Option<MethodFn> {
    match method {
        "fields" => Some(method_fields),
        "to_map" => Some(method_to_map),
        _ => None,
    }
}

/// `fields()`: field names in declaration order.
fn method_fields(instance: &ClassInstance, _args: &[Value]) -> EvalResult {
    let names = instance.fields.keys().map(Value::text).collect();
    Ok(Value::array(names))
}

/// `to_map()`: a detached map copy of the instance's fields.
fn method_to_map(instance: &ClassInstance, _args: &[Value]) -> EvalResult {
    Ok(Value::map(instance.fields.deep_copy()))
}
