//! Streaming: terrain cell window, cell cache, staggered build dispatch.
//!
//! # Invariants
//! - At most one build in flight per cell; `loading` guards rescheduling.
//! - Cell records are never removed by a window pass. Leaving the window only
//!   hides a cell; its geometry stays cached for re-entry.
//! - The window is recomputed only when the viewer crosses a cell boundary.
//!
//! Everything runs on the caller's thread. Deferred builds fire when the
//! world's logical clock, advanced by the host, reaches their due time.

mod cell;
mod clip;
mod config;
mod error;
mod grid;
mod manager;
mod scene;
mod schedule;
mod world;

pub use cell::{Cell, CellState};
pub use clip::{ClippingPlanes, Plane};
pub use config::StreamConfig;
pub use error::{BuildError, ConfigError, WorldError};
pub use grid::Grid;
pub use manager::CellManager;
pub use scene::{Scene, WaterPlane};
pub use schedule::{BuildOutcome, BuildRequest, BuildSchedule, BuildTicket, CellBuilder};
pub use world::{StreamStats, UpdateReport, World};

pub fn crate_info() -> &'static str {
    "heightscape-stream v0.1.0"
}
