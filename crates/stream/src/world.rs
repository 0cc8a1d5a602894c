use std::time::Duration;

use glam::Vec2;
use heightscape_common::{CellCoord, MeshHandle};

use crate::clip::ClippingPlanes;
use crate::config::StreamConfig;
use crate::error::{BuildError, ConfigError, WorldError};
use crate::manager::CellManager;
use crate::scene::{Scene, WaterPlane};
use crate::schedule::{BuildOutcome, BuildRequest, BuildSchedule, BuildTicket, CellBuilder};

/// What a single `update` or `advance` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// The viewer crossed into a new cell and the window was recomputed.
    pub window_changed: bool,
    pub created: usize,
    pub scheduled: usize,
    pub dispatched: usize,
    pub attached: usize,
    pub detached: usize,
    /// Geometry dropped by the eviction policy. The host owns these handles.
    pub evicted: Vec<(CellCoord, MeshHandle)>,
}

/// Snapshot of the cell cache for instrumentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub total_cells: usize,
    pub visible: usize,
    pub building: usize,
    pub ready: usize,
    pub attached: usize,
    /// Builds scheduled and not yet completed.
    pub in_flight: usize,
    /// Builds still waiting for their dispatch time.
    pub pending_dispatch: usize,
}

/// Streams terrain cells around a moving viewer into a scene.
///
/// The world keeps a `(2r+1)²` window of cells around the cell containing the
/// viewer. Cells entering the window get a deferred build; cells leaving it
/// are detached from the scene but keep their geometry so they can be shown
/// again without a rebuild.
pub struct World<S> {
    scene: S,
    cells: CellManager,
    width: f32,
    height: f32,
    clipping: ClippingPlanes,
    water: WaterPlane,
    schedule: BuildSchedule,
    clock: Duration,
    generation: u64,
    next_request: u64,
    evict_beyond: Option<u32>,
}

impl<S: Scene> World<S> {
    pub fn new(scene: S, config: &StreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cells = CellManager::new(config.cell_size, config.radius, config.queue_delay())?;
        let clipping = ClippingPlanes::new(cells.cell_scale());
        Ok(Self {
            scene,
            cells,
            width: config.world_width,
            height: config.world_height,
            clipping,
            water: WaterPlane {
                width: config.world_width,
                height: config.world_height,
                level: config.water_level,
            },
            schedule: BuildSchedule::new(),
            clock: Duration::ZERO,
            generation: 0,
            next_request: 0,
            evict_beyond: config.evict_beyond,
        })
    }

    pub fn cells(&self) -> &CellManager {
        &self.cells
    }

    pub fn clipping_planes(&self) -> &ClippingPlanes {
        &self.clipping
    }

    pub fn water(&self) -> &WaterPlane {
        &self.water
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// World extents `(width, height)`.
    pub fn extents(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Logical time driving deferred dispatch.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Snap a world coordinate down onto the grid.
    pub fn floor(&self, v: f32) -> i32 {
        self.cells.grid().floor(v)
    }

    /// Snap a world coordinate strictly up onto the grid.
    pub fn ceil(&self, v: f32) -> i32 {
        self.cells.grid().ceil(v)
    }

    /// Recompute the window for the viewer position and dispatch due builds.
    ///
    /// Does nothing to the window while the viewer stays inside the same cell.
    pub fn update<B>(&mut self, viewer: Vec2, builder: &mut B) -> UpdateReport
    where
        B: CellBuilder + ?Sized,
    {
        let _span = tracing::info_span!("world_update", x = viewer.x, y = viewer.y).entered();
        let mut report = UpdateReport::default();

        let center = self.cells.grid().cell_at(viewer);
        if self.cells.center() != Some(center) {
            report.window_changed = true;
            self.shift_window(viewer, center, &mut report);
            self.reconcile(&mut report);
            self.evict(center, &mut report);
        }

        self.dispatch_due(builder, &mut report);

        tracing::trace!(
            created = report.created,
            scheduled = report.scheduled,
            dispatched = report.dispatched,
            attached = report.attached,
            detached = report.detached,
            total = self.cells.len(),
            "world update complete"
        );
        report
    }

    /// Advance the logical clock and dispatch every build that became due.
    pub fn advance<B>(&mut self, dt: Duration, builder: &mut B) -> UpdateReport
    where
        B: CellBuilder + ?Sized,
    {
        self.clock += dt;
        let mut report = UpdateReport::default();
        self.dispatch_due(builder, &mut report);
        report
    }

    /// Record finished geometry for a build. Attaches it right away if the
    /// cell is visible and returns whether it did.
    pub fn complete_build(&mut self, ticket: BuildTicket, mesh: MeshHandle) -> Result<bool, WorldError> {
        self.finish(ticket, mesh)
    }

    /// Report a failed build. The cell becomes eligible for a new build on
    /// the next window pass that covers it.
    pub fn fail_build(&mut self, ticket: BuildTicket, error: BuildError) -> Result<(), WorldError> {
        self.check_ticket(ticket)?;
        if let Some(cell) = self.cells.get_mut(ticket.coord) {
            cell.request = None;
        }
        self.cells.release_slot();
        tracing::warn!(coord = %ticket.coord, %error, "cell build failed");
        Ok(())
    }

    /// Replace the grid geometry, discarding every cell.
    ///
    /// Attached meshes are detached and all built meshes are returned to the
    /// caller. Builds still outstanding become stale.
    pub fn reconfigure(&mut self, cell_size: i32, radius: i32) -> Result<Vec<MeshHandle>, ConfigError> {
        let dropped = self.cells.reset(cell_size, radius)?;
        self.schedule.clear();
        self.generation += 1;

        let mut meshes = Vec::new();
        for cell in dropped {
            if let Some(mesh) = cell.mesh {
                if cell.attached {
                    self.scene.detach(mesh);
                }
                meshes.push(mesh);
            }
        }
        self.clipping = ClippingPlanes::new(self.cells.cell_scale());

        tracing::info!(cell_size, radius, discarded = meshes.len(), "cell grid reconfigured");
        Ok(meshes)
    }

    pub fn stats(&self) -> StreamStats {
        let mut stats = StreamStats {
            total_cells: self.cells.len(),
            in_flight: self.cells.queue(),
            pending_dispatch: self.schedule.len(),
            ..StreamStats::default()
        };
        for cell in self.cells.iter() {
            stats.visible += usize::from(cell.visible);
            stats.building += usize::from(cell.is_loading());
            stats.ready += usize::from(cell.mesh.is_some());
            stats.attached += usize::from(cell.attached);
        }
        stats
    }

    fn shift_window(&mut self, viewer: Vec2, center: CellCoord, report: &mut UpdateReport) {
        let grid = self.cells.grid();
        self.cells.set_center(center);

        let upper = CellCoord::new(grid.ceil(viewer.x), grid.ceil(viewer.y));
        self.clipping.fit(center, upper, self.cells.cell_scale());

        self.cells.set_all_invisible();

        for coord in grid.window(center, self.cells.radius()) {
            let request = self.next_request;
            let (cell, created) = self.cells.get_or_create(coord);
            cell.visible = true;
            let needs_build = cell.needs_build();
            if needs_build {
                cell.request = Some(request);
            }

            if created {
                report.created += 1;
                tracing::debug!(%coord, "created cell");
            }
            if needs_build {
                self.next_request += 1;
                let due = self.clock + self.cells.take_slot();
                self.schedule.push(
                    BuildTicket {
                        coord,
                        generation: self.generation,
                        request,
                    },
                    due,
                );
                report.scheduled += 1;
                tracing::debug!(%coord, ?due, "scheduled cell build");
            }
        }
    }

    fn reconcile(&mut self, report: &mut UpdateReport) {
        for cell in self.cells.iter_mut() {
            let Some(mesh) = cell.mesh else { continue };
            if !cell.visible && cell.attached {
                self.scene.detach(mesh);
                cell.attached = false;
                report.detached += 1;
            } else if cell.visible && !cell.attached {
                self.scene.attach(mesh);
                cell.attached = true;
                report.attached += 1;
            }
        }
    }

    fn evict(&mut self, center: CellCoord, report: &mut UpdateReport) {
        let Some(factor) = self.evict_beyond else {
            return;
        };
        let grid = self.cells.grid();
        let limit = factor.saturating_mul(self.cells.radius().unsigned_abs());
        for cell in self.cells.iter_mut() {
            if grid.distance_in_cells(cell.coord(), center) <= limit {
                continue;
            }
            if let Some(mesh) = cell.mesh.take() {
                if cell.attached {
                    self.scene.detach(mesh);
                    cell.attached = false;
                }
                report.evicted.push((cell.coord(), mesh));
            }
        }
        if !report.evicted.is_empty() {
            tracing::debug!(count = report.evicted.len(), "evicted cell geometry");
        }
    }

    fn dispatch_due<B>(&mut self, builder: &mut B, report: &mut UpdateReport)
    where
        B: CellBuilder + ?Sized,
    {
        while let Some(ticket) = self.schedule.pop_due(self.clock) {
            let request = BuildRequest {
                ticket,
                size: self.cells.cell_size(),
            };
            report.dispatched += 1;
            tracing::debug!(coord = %ticket.coord, "dispatching cell build");

            match builder.build(&request) {
                BuildOutcome::Ready(mesh) => match self.finish(ticket, mesh) {
                    Ok(true) => report.attached += 1,
                    Ok(false) => {}
                    Err(err) => tracing::warn!(coord = %ticket.coord, %err, "dropped built mesh"),
                },
                BuildOutcome::Pending => {}
                BuildOutcome::Failed(error) => {
                    if let Err(err) = self.fail_build(ticket, error) {
                        tracing::warn!(coord = %ticket.coord, %err, "could not record build failure");
                    }
                }
            }
        }
    }

    /// Accept a ticket only if it names the cell's outstanding request in
    /// the current generation.
    fn check_ticket(&self, ticket: BuildTicket) -> Result<(), WorldError> {
        let coord = ticket.coord;
        let current = if ticket.generation == self.generation {
            let cell = self.cells.get(coord).ok_or(WorldError::UnknownCell(coord))?;
            match cell.request {
                None => return Err(WorldError::NotLoading(coord)),
                Some(id) => id == ticket.request,
            }
        } else {
            false
        };
        if !current {
            tracing::warn!(%coord, request = ticket.request, "stale build ticket");
            return Err(WorldError::StaleBuild { coord });
        }
        Ok(())
    }

    fn finish(&mut self, ticket: BuildTicket, mesh: MeshHandle) -> Result<bool, WorldError> {
        self.check_ticket(ticket)?;
        let coord = ticket.coord;
        let cell = self
            .cells
            .get_mut(coord)
            .ok_or(WorldError::UnknownCell(coord))?;
        cell.request = None;
        cell.mesh = Some(mesh);
        let attach = cell.visible;
        if attach {
            cell.attached = true;
            self.scene.attach(mesh);
        }
        self.cells.release_slot();
        tracing::debug!(%coord, attached = attach, "cell build complete");
        Ok(attach)
    }
}
