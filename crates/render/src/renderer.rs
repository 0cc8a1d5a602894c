use heightscape_common::CellCoord;
use heightscape_stream::{Cell, CellState, Scene, World};

/// Which part of the grid a debug view covers.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    /// Extra cells drawn around the visibility window on each side.
    pub margin: i32,
}

impl Default for MapView {
    fn default() -> Self {
        Self { margin: 1 }
    }
}

/// Renderer-agnostic interface over the streamed world.
///
/// Renderers read the cell cache and the view; they never change which cells
/// are attached.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render<S: Scene>(&self, world: &World<S>, view: &MapView) -> Self::Output;
}

/// Debug text renderer: the cell window as an ASCII map.
///
/// Legend: `#` attached, `o` built but hidden, `~` building, `.` known but
/// unbuilt, blank for coordinates with no record.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn glyph(cell: Option<&Cell>) -> char {
    match cell {
        None => ' ',
        Some(c) if c.is_attached() => '#',
        Some(c) => match c.state() {
            CellState::Ready => 'o',
            CellState::Building => '~',
            CellState::Unbuilt => '.',
        },
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render<S: Scene>(&self, world: &World<S>, view: &MapView) -> String {
        let cells = world.cells();
        let stats = world.stats();
        let mut out = String::new();

        let Some(center) = cells.center() else {
            out.push_str("=== Cells: no window yet ===\n");
            return out;
        };

        out.push_str(&format!(
            "=== Cells (size={}, radius={}, center={}) ===\n",
            cells.cell_size(),
            cells.radius(),
            center
        ));
        out.push_str(&format!(
            "Cells: {} visible={} building={} ready={} attached={} in_flight={}\n",
            stats.total_cells,
            stats.visible,
            stats.building,
            stats.ready,
            stats.attached,
            stats.in_flight
        ));
        let p = world.clipping_planes().planes();
        out.push_str(&format!(
            "Clip: +X {:.1} | -X {:.1} | +Z {:.1} | -Z {:.1}\n",
            p[0].constant, p[1].constant, p[2].constant, p[3].constant
        ));

        let size = cells.cell_size();
        let reach = cells.radius().saturating_add(view.margin.max(0));
        // Rows past the edge of the grid are skipped; columns past it stay blank.
        let step = |g: i32, base: i32| g.checked_mul(size).and_then(|d| base.checked_add(d));
        for gy in (-reach..=reach).rev() {
            let Some(y) = step(gy, center.y) else { continue };
            out.push_str(&format!("{y:>8} "));
            for gx in -reach..=reach {
                let cell = step(gx, center.x).and_then(|x| cells.get(CellCoord::new(x, y)));
                out.push(glyph(cell));
            }
            out.push('\n');
        }

        out
    }
}
