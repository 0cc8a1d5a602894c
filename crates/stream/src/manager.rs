use std::collections::BTreeMap;
use std::time::Duration;

use heightscape_common::CellCoord;

use crate::cell::Cell;
use crate::config::validate_grid;
use crate::error::ConfigError;
use crate::grid::Grid;

/// Coordinate-keyed cell cache plus the build queue counter.
///
/// Records are created lazily and never removed one at a time; a cell leaves
/// the rendered scene only through its `visible`/`mesh` flags. The whole
/// collection can be discarded through [`CellManager::reset`].
#[derive(Debug, Clone)]
pub struct CellManager {
    grid: Grid,
    radius: i32,
    center: Option<CellCoord>,
    cells: BTreeMap<CellCoord, Cell>,
    queue: usize,
    queue_delay: Duration,
}

impl CellManager {
    pub fn new(cell_size: i32, radius: i32, queue_delay: Duration) -> Result<Self, ConfigError> {
        validate_grid(cell_size, radius)?;
        Ok(Self {
            grid: Grid::new(cell_size),
            radius,
            center: None,
            cells: BTreeMap::new(),
            queue: 0,
            queue_delay,
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cell_size(&self) -> i32 {
        self.grid.cell_size()
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// World-space half-extent of the window: `radius * cell_size`.
    pub fn cell_scale(&self) -> i32 {
        self.radius * self.grid.cell_size()
    }

    /// Snapped cell containing the viewer at the last window pass.
    pub fn center(&self) -> Option<CellCoord> {
        self.center
    }

    pub(crate) fn set_center(&mut self, center: CellCoord) {
        self.center = Some(center);
    }

    /// Builds scheduled and not yet completed.
    pub fn queue(&self) -> usize {
        self.queue
    }

    /// Reserve a queue slot and return the dispatch delay for it.
    pub(crate) fn take_slot(&mut self) -> Duration {
        let slot = self.queue;
        self.queue += 1;
        self.queue_delay
            .saturating_mul(u32::try_from(slot).unwrap_or(u32::MAX))
    }

    pub(crate) fn release_slot(&mut self) {
        self.queue = self.queue.saturating_sub(1);
    }

    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub(crate) fn get_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord)
    }

    /// Fetch the cell at `coord`, creating it if needed. The flag reports
    /// whether a new record was created.
    pub(crate) fn get_or_create(&mut self, coord: CellCoord) -> (&mut Cell, bool) {
        let mut created = false;
        let cell = self.cells.entry(coord).or_insert_with(|| {
            created = true;
            Cell::new(coord)
        });
        (cell, created)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }

    /// Number of cell records ever created since the last reset.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.cells.values().filter(|c| c.visible).count()
    }

    pub(crate) fn set_all_invisible(&mut self) {
        for cell in self.cells.values_mut() {
            cell.visible = false;
        }
    }

    /// Discard every record and apply a new grid. Returns the discarded cells
    /// so the caller can release their geometry.
    pub(crate) fn reset(&mut self, cell_size: i32, radius: i32) -> Result<Vec<Cell>, ConfigError> {
        validate_grid(cell_size, radius)?;
        self.grid = Grid::new(cell_size);
        self.radius = radius;
        self.center = None;
        self.queue = 0;
        Ok(std::mem::take(&mut self.cells).into_values().collect())
    }
}
