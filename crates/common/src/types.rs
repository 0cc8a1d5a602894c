use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid coordinate of a terrain cell.
///
/// Holds the world-space origin of the cell (its minimum corner), always a
/// multiple of the cell size. World `y` is the horizontal axis that the
/// renderer calls `z`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space origin as a float vector.
    pub fn origin(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Opaque handle to built cell geometry owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_order_by_x_then_y() {
        let mut coords = vec![
            CellCoord::new(128, 0),
            CellCoord::new(0, 128),
            CellCoord::new(0, -128),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                CellCoord::new(0, -128),
                CellCoord::new(0, 128),
                CellCoord::new(128, 0)
            ]
        );
    }

    #[test]
    fn origin_is_min_corner() {
        let c = CellCoord::new(-128, 256);
        assert_eq!(c.origin(), Vec2::new(-128.0, 256.0));
    }

    #[test]
    fn coord_display() {
        assert_eq!(CellCoord::new(3, -4).to_string(), "(3, -4)");
    }
}
