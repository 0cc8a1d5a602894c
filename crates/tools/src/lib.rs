//! Developer tooling: cell inspector and streaming summaries.
//!
//! # Invariants
//! - Tools only read the world.

mod inspector;

pub use inspector::{CellInfo, CellInspector, CellSummary};

pub fn crate_info() -> &'static str {
    "heightscape-tools v0.1.0"
}
