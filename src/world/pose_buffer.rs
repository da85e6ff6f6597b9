//! Double-buffered pose hand-off between a simulation thread and a render thread.

use parking_lot::{Mutex, RwLock};

use crate::core::{pose::Pose, types::VisualHandle};

use super::PhysicsWorld;

/// Poses of one published tick.
#[derive(Debug, Clone, Default)]
pub struct PoseSnapshot {
    /// Tick count of the world when the snapshot was taken.
    pub tick: u64,
    /// Pose of every body, indexed by `BodyId`.
    pub poses: Vec<Pose>,
    /// Poses of the bodies mirrored by an external visual.
    pub visuals: Vec<(VisualHandle, Pose)>,
}

/// Readers see whole snapshots only; the writer fills a back buffer and swaps.
#[derive(Default)]
pub struct PoseBuffer {
    front: RwLock<PoseSnapshot>,
    back: Mutex<PoseSnapshot>,
}

impl PoseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the world's current poses and makes them visible to readers.
    pub fn publish(&self, world: &PhysicsWorld) {
        let mut back = self.back.lock();
        back.tick = world.ticks();
        back.poses.clear();
        back.poses.extend(world.bodies.iter().map(|body| body.pose));
        back.visuals.clear();
        back.visuals.extend(world.visual_poses());

        let mut front = self.front.write();
        std::mem::swap(&mut *front, &mut *back);
    }

    /// Runs `f` against the latest published snapshot without copying it.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&PoseSnapshot) -> R) -> R {
        f(&self.front.read())
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        self.front.read().clone()
    }

    pub fn latest_tick(&self) -> u64 {
        self.front.read().tick
    }
}
