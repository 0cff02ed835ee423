//! Global variable store.
//!
//! Tally has one flat namespace. `let` creates a binding and fails if it
//! exists; plain assignment replaces a binding and fails if it is missing or
//! if the new value has a different variant. Loops remove the variables they
//! own when they finish.

mod path;

use rustc_hash::FxHashMap;
use tally_patterns::{
    duplicate_variable, undefined_variable, variant_change, EvalError, EvalResult, Value,
};
use tracing::trace;

use crate::evaluator::Scope;

pub use path::{walk, write, IndexKey, IndexLookup, PathSegment, VarPath};

/// Why a bind or rebind was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("variable `{0}` is already defined")]
    AlreadyDefined(String),
    #[error("variable `{0}` is not defined")]
    Undefined(String),
    #[error("cannot change `{name}` from {expected} to {got}")]
    VariantMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },
}

impl From<AssignError> for EvalError {
    fn from(err: AssignError) -> Self {
        match err {
            AssignError::AlreadyDefined(name) => duplicate_variable(&name),
            AssignError::Undefined(name) => undefined_variable(&name),
            AssignError::VariantMismatch {
                name,
                expected,
                got,
            } => variant_change(&name, expected, got),
        }
    }
}

/// Name → value bindings for one run.
#[derive(Debug, Default)]
pub struct VariableStore {
    vars: FxHashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binding.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        if self.vars.contains_key(name) {
            return Err(AssignError::AlreadyDefined(name.to_string()));
        }
        trace!(name, value = %value, "bind");
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Replace a binding with a value of the same variant.
    pub fn rebind(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        let slot = self
            .vars
            .get_mut(name)
            .ok_or_else(|| AssignError::Undefined(name.to_string()))?;
        if !slot.same_variant(&value) {
            return Err(AssignError::VariantMismatch {
                name: name.to_string(),
                expected: slot.type_name(),
                got: value.type_name(),
            });
        }
        trace!(name, value = %value, "rebind");
        *slot = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Drop a binding; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a path such as `lib->books[1]->title` or `pet.fields()`.
    pub fn resolve(&self, path: &str) -> EvalResult {
        let path = VarPath::parse(path)?;
        self.resolve_parsed(&path)
    }

    pub fn resolve_parsed(&self, path: &VarPath) -> EvalResult {
        let root = self
            .get(&path.root)
            .cloned()
            .ok_or_else(|| undefined_variable(&path.root))?;
        walk(root, &path.segments, &|name| self.get(name).cloned())
    }

    /// Write through a path. A bare name is a [`rebind`](Self::rebind);
    /// anything longer writes into the container the path leads to.
    pub fn assign(&mut self, path: &str, value: Value) -> Result<(), EvalError> {
        let path = VarPath::parse(path)?;
        let Some((last, parents)) = path.segments.split_last() else {
            return Ok(self.rebind(&path.root, value)?);
        };
        let root = self
            .get(&path.root)
            .cloned()
            .ok_or_else(|| undefined_variable(&path.root))?;
        let lookup = |name: &str| self.get(name).cloned();
        let container = walk(root, parents, &lookup)?;
        write(&container, last, value, &lookup)
    }
}

impl Scope for VariableStore {
    fn resolve(&self, path: &str) -> EvalResult {
        VariableStore::resolve(self, path)
    }

    fn assign(&mut self, path: &str, value: Value) -> Result<(), EvalError> {
        VariableStore::assign(self, path, value)
    }
}
