//! Conversion of interpreter failures into diagnostics.
//!
//! Lives in `tallyc` because neither `tally_patterns` (which owns
//! `EvalError`) nor `tally_diagnostic` (which owns `Diagnostic`) depends on
//! the other.

pub mod eval;

pub use eval::{error_code_for_kind, eval_error_to_diagnostic};
