//! Rendering adapters: in-memory scene and debug views of the cell window.
//!
//! # Invariants
//! - Renderers only read world state; scene membership changes go through
//!   the world.
//!
//! # Workaround
//! Stands in for the retained-mode GPU scene graph. `RecordingScene` keeps the
//! render list in memory and `DebugTextRenderer` prints the cell window as an
//! ASCII map, which is enough for the CLI and for tests.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, MapView, Renderer};
pub use scene::{RecordingScene, SceneOp};

pub fn crate_info() -> &'static str {
    "heightscape-render v0.1.0"
}
