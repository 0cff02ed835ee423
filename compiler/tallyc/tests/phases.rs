// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Whole-program tests for the `tally` driver.
//!
//! # Organization
//!
//! - `common/` - helpers that run source text with captured output
//! - `programs/` - complete programs, preprocessing included
//! - `diagnostics/` - failures as users see them
//!
//! ```bash
//! cargo test -p tallyc --test phases
//! ```

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/programs/mod.rs"]
mod programs;

#[path = "phases/diagnostics/mod.rs"]
mod diagnostics;
