use glam::Vec2;
use heightscape_common::CellCoord;

/// Fixed-size square grid used to snap world positions onto cell boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cell_size: i32,
}

impl Grid {
    /// Create a grid with the given cell size. Callers validate `cell_size > 0`.
    pub(crate) fn new(cell_size: i32) -> Self {
        debug_assert!(cell_size > 0, "cell_size must be positive");
        Self { cell_size }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Snap a world coordinate down to the cell boundary at or below it.
    ///
    /// Positions beyond the addressable grid clamp to its outermost cell;
    /// NaN snaps to the origin.
    pub fn floor(&self, v: f32) -> i32 {
        self.snap((v / self.cell_size as f32).floor())
    }

    /// Snap a world coordinate up to the next cell boundary.
    ///
    /// Always strictly greater than `v` inside the addressable grid: a value
    /// already on a boundary moves up by one whole cell.
    pub fn ceil(&self, v: f32) -> i32 {
        let frac = v / self.cell_size as f32;
        let mut round = frac.ceil();
        if frac == round {
            round += 1.0;
        }
        self.snap(round)
    }

    fn snap(&self, index: f32) -> i32 {
        // Float-to-int casts saturate, so only the multiply needs bounding.
        let min = i32::MIN / self.cell_size;
        let max = i32::MAX / self.cell_size;
        (index as i32).clamp(min, max) * self.cell_size
    }

    /// The cell containing a world position.
    pub fn cell_at(&self, pos: Vec2) -> CellCoord {
        CellCoord::new(self.floor(pos.x), self.floor(pos.y))
    }

    /// Cells of the `(2r+1)²` window around `center`, rows of increasing `y`
    /// with `x` increasing inside each row.
    ///
    /// Callers keep `radius * cell_size` representable. Cells that would fall
    /// off the edge of the grid are skipped.
    pub fn window(self, center: CellCoord, radius: i32) -> impl Iterator<Item = CellCoord> {
        let size = self.cell_size;
        (-radius..=radius).flat_map(move |gy| {
            (-radius..=radius).filter_map(move |gx| {
                let x = center.x.checked_add(gx * size)?;
                let y = center.y.checked_add(gy * size)?;
                Some(CellCoord::new(x, y))
            })
        })
    }

    /// Chebyshev distance between two cells, counted in cells.
    pub fn distance_in_cells(&self, a: CellCoord, b: CellCoord) -> u32 {
        let size = self.cell_size.unsigned_abs();
        let dx = a.x.abs_diff(b.x) / size;
        let dy = a.y.abs_diff(b.y) / size;
        dx.max(dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<f32> {
        let mut v = vec![0.0, -0.0, 1.0, -1.0, 127.5, 128.0, -128.0, 130.0, 10290.0, -8920.25];
        for i in -40..40 {
            v.push(i as f32 * 37.3);
            v.push(i as f32 * 64.0);
        }
        v
    }

    #[test]
    fn floor_snaps_down() {
        let grid = Grid::new(128);
        assert_eq!(grid.floor(0.0), 0);
        assert_eq!(grid.floor(127.9), 0);
        assert_eq!(grid.floor(128.0), 128);
        assert_eq!(grid.floor(130.0), 128);
        assert_eq!(grid.floor(-0.5), -128);
        assert_eq!(grid.floor(-128.0), -128);
    }

    #[test]
    fn floor_is_idempotent() {
        for cell_size in [1, 7, 64, 128, 1024] {
            let grid = Grid::new(cell_size);
            for v in samples() {
                let once = grid.floor(v);
                assert_eq!(grid.floor(once as f32), once, "v={v} size={cell_size}");
            }
        }
    }

    #[test]
    fn ceil_is_strictly_greater_and_aligned() {
        for cell_size in [1, 7, 64, 128, 1024] {
            let grid = Grid::new(cell_size);
            for v in samples() {
                let c = grid.ceil(v);
                assert!(c as f32 > v, "ceil({v}) = {c} with size {cell_size}");
                assert_eq!(c % cell_size, 0);
            }
        }
    }

    #[test]
    fn ceil_bumps_on_boundary() {
        let grid = Grid::new(128);
        assert_eq!(grid.ceil(0.0), 128);
        assert_eq!(grid.ceil(128.0), 256);
        assert_eq!(grid.ceil(130.0), 256);
        assert_eq!(grid.ceil(-128.0), 0);
        assert_eq!(grid.ceil(-127.0), 0);
    }

    #[test]
    fn cell_at_uses_both_axes() {
        let grid = Grid::new(16);
        assert_eq!(grid.cell_at(Vec2::new(10.0, 10.0)), CellCoord::new(0, 0));
        assert_eq!(grid.cell_at(Vec2::new(20.0, -5.0)), CellCoord::new(16, -16));
    }

    #[test]
    fn window_is_row_major_and_square() {
        let grid = Grid::new(128);
        let cells: Vec<_> = grid.window(CellCoord::new(0, 0), 1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], CellCoord::new(-128, -128));
        assert_eq!(cells[1], CellCoord::new(0, -128));
        assert_eq!(cells[3], CellCoord::new(-128, 0));
        assert_eq!(cells[8], CellCoord::new(128, 128));

        assert_eq!(grid.window(CellCoord::new(0, 0), 0).count(), 1);
        assert_eq!(grid.window(CellCoord::new(0, 0), 5).count(), 121);
    }

    #[test]
    fn distance_is_chebyshev() {
        let grid = Grid::new(128);
        let a = CellCoord::new(0, 0);
        assert_eq!(grid.distance_in_cells(a, a), 0);
        assert_eq!(grid.distance_in_cells(a, CellCoord::new(256, -128)), 2);
        assert_eq!(grid.distance_in_cells(a, CellCoord::new(-384, 384)), 3);

        let low = CellCoord::new(i32::MIN, i32::MAX - 127);
        let high = CellCoord::new(i32::MAX - 127, 0);
        assert_eq!(grid.distance_in_cells(low, high), u32::MAX / 128);
    }

    #[test]
    fn snapping_clamps_to_addressable_grid() {
        let grid = Grid::new(128);
        let top = i32::MAX / 128 * 128;
        let bottom = i32::MIN / 128 * 128;

        assert_eq!(grid.floor(3.0e9), top);
        assert_eq!(grid.floor(-3.0e9), bottom);
        assert_eq!(grid.floor(f32::INFINITY), top);
        assert_eq!(grid.floor(f32::NEG_INFINITY), bottom);
        assert_eq!(grid.floor(f32::NAN), 0);
        assert_eq!(grid.ceil(3.0e9), top);
        assert_eq!(grid.floor(grid.floor(3.0e9) as f32), top);
    }

    #[test]
    fn window_skips_cells_past_the_edge() {
        let grid = Grid::new(128);
        let corner = grid.cell_at(Vec2::splat(f32::MAX));
        let cells: Vec<_> = grid.window(corner, 1).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&corner));
        assert!(cells.iter().all(|c| c.x <= corner.x && c.y <= corner.y));
    }
}
