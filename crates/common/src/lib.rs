//! Shared value types used across the heightscape crates.

mod types;

pub use types::{CellCoord, MeshHandle};
