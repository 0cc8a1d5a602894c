use heightscape_common::{CellCoord, MeshHandle};
use heightscape_stream::{CellState, Scene, World};

/// Cell inspector for developer tooling.
///
/// Read-only queries against the cell cache for debugging and profiling.
pub struct CellInspector;

impl CellInspector {
    /// Produce a summary of the streaming state.
    pub fn summary<S: Scene>(world: &World<S>) -> CellSummary {
        let stats = world.stats();
        CellSummary {
            center: world.cells().center(),
            cell_size: world.cells().cell_size(),
            radius: world.cells().radius(),
            total_cells: stats.total_cells,
            visible: stats.visible,
            building: stats.building,
            ready: stats.ready,
            attached: stats.attached,
            in_flight: stats.in_flight,
        }
    }

    /// Details of a single cell, if a record exists for it.
    pub fn inspect_cell<S: Scene>(world: &World<S>, coord: CellCoord) -> Option<CellInfo> {
        world.cells().get(coord).map(|cell| CellInfo {
            coord,
            state: cell.state(),
            visible: cell.is_visible(),
            attached: cell.is_attached(),
            mesh: cell.mesh(),
        })
    }

    /// Coordinates of all visible cells, in coordinate order.
    pub fn list_visible<S: Scene>(world: &World<S>) -> Vec<CellCoord> {
        world
            .cells()
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| c.coord())
            .collect()
    }

    /// Visible cells still waiting for geometry.
    pub fn list_stalled<S: Scene>(world: &World<S>) -> Vec<CellCoord> {
        world
            .cells()
            .iter()
            .filter(|c| c.is_visible() && c.mesh().is_none())
            .map(|c| c.coord())
            .collect()
    }
}

/// Summary of the streaming state.
#[derive(Debug, Clone)]
pub struct CellSummary {
    pub center: Option<CellCoord>,
    pub cell_size: i32,
    pub radius: i32,
    pub total_cells: usize,
    pub visible: usize,
    pub building: usize,
    pub ready: usize,
    pub attached: usize,
    pub in_flight: usize,
}

impl std::fmt::Display for CellSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let center = self
            .center
            .map_or_else(|| "none".to_string(), |c| c.to_string());
        write!(
            f,
            "Cells: center={} size={} radius={} total={} visible={} building={} ready={} attached={} in_flight={}",
            center,
            self.cell_size,
            self.radius,
            self.total_cells,
            self.visible,
            self.building,
            self.ready,
            self.attached,
            self.in_flight
        )
    }
}

/// Detailed info about a single cell.
#[derive(Debug, Clone)]
pub struct CellInfo {
    pub coord: CellCoord,
    pub state: CellState,
    pub visible: bool,
    pub attached: bool,
    pub mesh: Option<MeshHandle>,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell {} state={:?} visible={} attached={}",
            self.coord, self.state, self.visible, self.attached
        )?;
        if let Some(mesh) = self.mesh {
            write!(f, " mesh={}", mesh.0)?;
        }
        Ok(())
    }
}
