use glam::Vec2;
use heightscape_common::MeshHandle;

/// Render-list collaborator the world reflects cell visibility into.
///
/// Both operations are idempotent: attaching a handle that is already in the
/// scene or detaching one that is absent does nothing.
pub trait Scene {
    fn attach(&mut self, mesh: MeshHandle);
    fn detach(&mut self, mesh: MeshHandle);
}

/// Water surface spanning the whole world, handed to the host for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterPlane {
    pub width: f32,
    pub height: f32,
    /// Height of the surface along the vertical axis.
    pub level: f32,
}

impl WaterPlane {
    /// Center of the plane in world coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}
