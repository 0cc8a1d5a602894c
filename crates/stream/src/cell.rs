use heightscape_common::{CellCoord, MeshHandle};

/// Lifecycle stage of a cell, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// No geometry and no build in flight.
    Unbuilt,
    /// A build has been requested and has not completed.
    Building,
    /// Geometry is cached on the cell.
    Ready,
}

/// One square terrain tile and its cached geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    pub(crate) visible: bool,
    /// Id of the outstanding build request, if any.
    pub(crate) request: Option<u64>,
    pub(crate) attached: bool,
    pub(crate) mesh: Option<MeshHandle>,
}

impl Cell {
    pub(crate) fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            visible: false,
            request: None,
            attached: false,
            mesh: None,
        }
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Inside the viewer's window as of the last window pass.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A build is in flight.
    pub fn is_loading(&self) -> bool {
        self.request.is_some()
    }

    /// The mesh is currently part of the scene.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub fn state(&self) -> CellState {
        match (self.mesh, self.is_loading()) {
            (Some(_), _) => CellState::Ready,
            (None, true) => CellState::Building,
            (None, false) => CellState::Unbuilt,
        }
    }

    /// Whether a window pass should request a build for this cell.
    pub(crate) fn needs_build(&self) -> bool {
        self.mesh.is_none() && self.request.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_unbuilt_and_hidden() {
        let cell = Cell::new(CellCoord::new(128, -128));
        assert_eq!(cell.coord(), CellCoord::new(128, -128));
        assert!(!cell.is_visible());
        assert!(!cell.is_attached());
        assert_eq!(cell.state(), CellState::Unbuilt);
        assert!(cell.needs_build());
    }

    #[test]
    fn state_follows_flags() {
        let mut cell = Cell::new(CellCoord::default());
        cell.request = Some(3);
        assert_eq!(cell.state(), CellState::Building);
        assert!(!cell.needs_build());

        cell.request = None;
        cell.mesh = Some(MeshHandle(7));
        assert_eq!(cell.state(), CellState::Ready);
        assert!(!cell.needs_build());
    }
}
