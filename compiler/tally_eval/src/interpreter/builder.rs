//! `InterpreterBuilder` for creating interpreters with custom output,
//! step limits or operation sets.

use std::rc::Rc;

use tally_patterns::{ControlStacks, OperationRegistry, RegistryError};

use super::Interpreter;
use crate::classes::ClassRegistry;
use crate::environment::VariableStore;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Defaults: the built-in operation catalog, stdout output, no step limit.
#[derive(Default)]
pub struct InterpreterBuilder {
    registry: Option<OperationRegistry>,
    print_handler: Option<SharedPrintHandler>,
    max_steps: Option<u64>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom operation registry instead of the built-in catalog.
    #[must_use]
    pub fn registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the print handler for `print`, `get` and friends.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Stop a run after `limit` dispatched statements.
    #[must_use]
    pub fn max_steps(mut self, limit: Option<u64>) -> Self {
        self.max_steps = limit;
        self
    }

    /// Build the interpreter. Fails only if the built-in catalog does not
    /// compile.
    pub fn build(self) -> Result<Interpreter, RegistryError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => OperationRegistry::builtin()?,
        };
        Ok(Interpreter {
            registry: Rc::new(registry),
            store: VariableStore::new(),
            classes: ClassRegistry::new(),
            control: ControlStacks::default(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            max_steps: self.max_steps,
            steps: 0,
            lines: Rc::from(Vec::new()),
            program: Rc::from(""),
            starts: Vec::new(),
            current: 0,
        })
    }
}
