use std::collections::BTreeSet;

use heightscape_common::MeshHandle;
use heightscape_stream::Scene;

/// A change applied to the render list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Attach(MeshHandle),
    Detach(MeshHandle),
}

/// In-memory render list that records every effective change.
///
/// Redundant attaches and detaches are ignored and not recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    attached: BTreeSet<MeshHandle>,
    ops: Vec<SceneOp>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, mesh: MeshHandle) -> bool {
        self.attached.contains(&mesh)
    }

    /// Meshes currently in the scene, in handle order.
    pub fn meshes(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.attached.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn ops(&self) -> &[SceneOp] {
        &self.ops
    }

    /// Drain and return the recorded operations.
    pub fn drain_ops(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Scene for RecordingScene {
    fn attach(&mut self, mesh: MeshHandle) {
        if self.attached.insert(mesh) {
            tracing::trace!(?mesh, "attached mesh");
            self.ops.push(SceneOp::Attach(mesh));
        }
    }

    fn detach(&mut self, mesh: MeshHandle) {
        if self.attached.remove(&mesh) {
            tracing::trace!(?mesh, "detached mesh");
            self.ops.push(SceneOp::Detach(mesh));
        }
    }
}
