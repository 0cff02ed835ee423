//! Registered classes.
//!
//! A class body is a list of field declarations:
//!
//! ```text
//! class Library:
//!     Established: 1900 as int;
//!     Books: [];
//!     LibraryType: "Public" $overwrite$;
//! class:end;
//! ```
//!
//! Every declaration is evaluated once, when the block runs. Native methods
//! can be attached from Rust with [`ClassRegistry::define_method`], before or
//! after the class itself is defined.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tally_patterns::{
    duplicate_class, malformed_literal, undefined_class, ClassDefinition, EvalError, EvalResult,
    MethodFn, Value,
};
use tracing::debug;

/// Marker allowing a field to replace an earlier declaration.
const OVERWRITE_MARKER: &str = "$overwrite$";

/// One parsed `name: expr [as T] [$overwrite$]` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl<'a> {
    pub name: &'a str,
    pub expr: &'a str,
    pub type_name: Option<&'a str>,
    pub overwrite: bool,
}

impl<'a> FieldDecl<'a> {
    pub fn parse(line: &'a str) -> Result<Self, EvalError> {
        let line = line.trim();
        let (rest, overwrite) = match line.strip_suffix(OVERWRITE_MARKER) {
            Some(rest) => (rest.trim_end(), true),
            None => (line, false),
        };
        let (name, value) = rest
            .split_once(':')
            .ok_or_else(|| malformed_literal(line, "class fields are declared as `name: value`"))?;
        let name = name.trim();
        if !is_identifier(name) {
            return Err(malformed_literal(name, "field names must be identifiers"));
        }
        let value = value.trim();
        let (expr, type_name) = split_type_suffix(value);
        if expr.is_empty() {
            return Err(malformed_literal(line, "field has no value"));
        }
        Ok(FieldDecl {
            name,
            expr,
            type_name,
            overwrite,
        })
    }
}

/// Split `expr as T` when `T` looks like a type name and ` as ` is not
/// inside a quoted string.
fn split_type_suffix(value: &str) -> (&str, Option<&str>) {
    if let Some((expr, ty)) = value.rsplit_once(" as ") {
        let ty = ty.trim();
        let bare = ty.trim_start_matches('[').trim_end_matches(']');
        let quotes_closed = expr.matches('"').count() % 2 == 0;
        if quotes_closed && is_identifier(bare) {
            return (expr.trim(), Some(ty));
        }
    }
    (value, None)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Classes defined so far, plus native methods waiting for their class.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: FxHashMap<String, Rc<ClassDefinition>>,
    pending_methods: FxHashMap<String, Vec<(String, MethodFn)>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished definition. Pending native methods are attached.
    pub fn register(&mut self, mut class: ClassDefinition) -> Result<Rc<ClassDefinition>, EvalError> {
        let name = class.name().to_string();
        if self.classes.contains_key(&name) {
            return Err(duplicate_class(&name));
        }
        for (method, func) in self.pending_methods.remove(&name).unwrap_or_default() {
            class.add_method(&method, func)?;
        }
        debug!(class = %name, fields = class.fields().len(), "registered class");
        let class = Rc::new(class);
        self.classes.insert(name, Rc::clone(&class));
        Ok(class)
    }

    /// Attach a native method.
    ///
    /// Instances created before this call keep the method table they were
    /// created with.
    pub fn define_method(
        &mut self,
        class: &str,
        method: &str,
        func: MethodFn,
    ) -> Result<(), EvalError> {
        match self.classes.get_mut(class) {
            Some(definition) => Rc::make_mut(definition).add_method(method, func),
            None => {
                self.pending_methods
                    .entry(class.to_string())
                    .or_default()
                    .push((method.to_string(), func));
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rc<ClassDefinition>> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// New instance with its own copy of the field defaults.
    pub fn instantiate(&self, name: &str) -> EvalResult {
        let class = self.get(name).ok_or_else(|| undefined_class(name))?;
        Ok(Value::instance(class.instantiate()))
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
