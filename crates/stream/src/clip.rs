use glam::Vec3;
use heightscape_common::CellCoord;

/// A plane `normal · p + constant = 0`. Points with negative distance lie on
/// the clipped side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// Four axis-aligned planes that mask the low-detail backdrop wherever
/// high-detail cells are loaded.
///
/// Order is `+X`, `-X`, `+Z`, `-Z`. World `y` maps to scene `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlanes {
    planes: [Plane; 4],
}

impl ClippingPlanes {
    /// Initial planes before the first window pass.
    pub fn new(cell_scale: i32) -> Self {
        let c = -(cell_scale as f32);
        Self {
            planes: [
                Plane::new(Vec3::X, c),
                Plane::new(Vec3::NEG_X, c),
                Plane::new(Vec3::Z, c),
                Plane::new(Vec3::NEG_Z, c),
            ],
        }
    }

    /// Fit the planes to a window whose center cell starts at `floor` and
    /// whose upper snapped bound is `ceil`.
    pub fn fit(&mut self, floor: CellCoord, ceil: CellCoord, cell_scale: i32) {
        let scale = cell_scale as f32;
        self.planes[0].constant = -(ceil.x as f32) - scale;
        self.planes[1].constant = floor.x as f32 - scale;
        self.planes[2].constant = -(ceil.y as f32) - scale;
        self.planes[3].constant = floor.y as f32 - scale;
    }

    pub fn planes(&self) -> &[Plane; 4] {
        &self.planes
    }

    /// Whether the backdrop is masked at `point`: only when every plane
    /// clips it, i.e. the point lies inside the loaded window.
    pub fn clips(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) < 0.0)
    }
}
