//! Built-in operation catalog.
//!
//! Registration order is priority order: when two operations score the
//! same, the one listed first wins.

mod classes;
mod conditional;
mod goto;
mod loops;
mod math;
mod variables;

use crate::OperationDefinition;

pub use classes::{
    CallOperation, ClassBlockOperation, ClassEndOperation, NewOperation,
    UnterminatedClassOperation,
};
pub use conditional::{ElseOperation, EndIfOperation, IfOperation};
pub use goto::{GotoOperation, LabelOperation};
pub use loops::{EndForOperation, EndForeachOperation, ForOperation, ForeachOperation};
pub use math::{AddOperation, DivOperation, MulOperation, SubOperation};
pub use variables::{
    AssignOperation, CountOperation, GetOperation, LetOperation, PrintOperation, SetOperation,
};

/// Every built-in operation, in registration order.
pub static ALL: &[&dyn OperationDefinition] = &[
    &LetOperation,
    &NewOperation,
    &AssignOperation,
    &SetOperation,
    &GetOperation,
    &PrintOperation,
    &CountOperation,
    &AddOperation,
    &SubOperation,
    &MulOperation,
    &DivOperation,
    &ClassBlockOperation,
    &UnterminatedClassOperation,
    &ClassEndOperation,
    &CallOperation,
    &IfOperation,
    &ElseOperation,
    &EndIfOperation,
    &ForOperation,
    &EndForOperation,
    &ForeachOperation,
    &EndForeachOperation,
    &LabelOperation,
    &GotoOperation,
];
