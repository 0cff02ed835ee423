//! Tracing subscriber setup for the `tally` binary.
//!
//! Off unless `RUST_LOG` is set:
//!
//! ```text
//! RUST_LOG=tally_eval=debug tally run main.tly           # one line per dispatch
//! RUST_LOG=trace TALLY_LOG_TREE=1 tally run main.tly     # indented span tree
//! ```

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);

        // A subscriber installed by an embedding program wins.
        let _ = if tree_layout() {
            registry
                .with(
                    HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
    });
}

fn tree_layout() -> bool {
    std::env::var("TALLY_LOG_TREE").is_ok_and(|value| value == "1" || value == "true")
}
