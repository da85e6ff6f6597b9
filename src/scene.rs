//! Ready-made scenes used by the demos, benchmarks and tests.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        constraints::Joint,
        pose::Pose,
        rigidbody::Body,
        types::{BodyHandle, VisualHandle},
    },
    error::Result,
    utils::allocator::{BodyId, JointId},
    world::PhysicsWorld,
};

/// A column of thin boxes hanging from the world, joined corner to corner by
/// spherical joints on alternating sides. The last box is wider and heavier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HangingChain {
    pub num_objects: usize,
    pub object_size: Vec3,
    pub last_object_size: Vec3,
    pub density: f32,
    pub rot_damping: f32,
    pub pos_damping: f32,
}

impl Default for HangingChain {
    fn default() -> Self {
        Self {
            num_objects: 100,
            object_size: Vec3::new(0.02, 0.04, 0.02),
            last_object_size: Vec3::new(0.2, 0.04, 0.2),
            density: 1.0,
            rot_damping: 1000.0,
            pos_damping: 1000.0,
        }
    }
}

/// Ids created by [`HangingChain::build`], top to bottom.
#[derive(Debug, Clone, Default)]
pub struct ChainHandles {
    pub bodies: Vec<BodyId>,
    pub joints: Vec<JointId>,
}

impl HangingChain {
    pub fn with_objects(mut self, num_objects: usize) -> Self {
        self.num_objects = num_objects;
        self
    }

    pub fn with_sizes(mut self, object_size: Vec3, last_object_size: Vec3) -> Self {
        self.object_size = object_size;
        self.last_object_size = last_object_size;
        self
    }

    pub fn with_damping(mut self, rot_damping: f32, pos_damping: f32) -> Self {
        self.rot_damping = rot_damping;
        self.pos_damping = pos_damping;
        self
    }

    /// Height of the top box's center.
    pub fn top_height(&self) -> f32 {
        (self.num_objects as f32 * self.object_size.y + self.last_object_size.y) * 1.4 + 0.2
    }

    /// Adds the chain to `world`. Body `i` gets `VisualHandle(i)`.
    pub fn build(&self, world: &mut PhysicsWorld) -> Result<ChainHandles> {
        let mut handles = ChainHandles::default();
        let top = Vec3::new(0.0, self.top_height(), 0.0);
        let frame = Quat::from_rotation_z(FRAC_PI_2);

        let mut previous: Option<BodyId> = None;
        let mut previous_size = self.object_size;

        for i in 0..self.num_objects {
            let size = if i + 1 < self.num_objects {
                self.object_size
            } else {
                self.last_object_size
            };

            let pose = Pose::from_position(top - Vec3::Y * (i as f32 * self.object_size.y));
            let mut body = Body::new(pose, Some(VisualHandle(i as u64)));
            body.set_box(size, self.density)?;
            let id = world.add_body(body);

            let side = if i % 2 == 0 { -0.5 } else { 0.5 };
            let local0 = Pose::new(
                Vec3::new(side * size.x, 0.5 * size.y, side * size.z),
                frame,
            );
            let (body1, local1) = match previous {
                Some(prev) => (
                    BodyHandle::Dynamic(prev),
                    Pose::new(
                        Vec3::new(
                            side * previous_size.x,
                            -0.5 * previous_size.y,
                            side * previous_size.z,
                        ),
                        frame,
                    ),
                ),
                // hang the first box from the world at its own attachment point
                None => (BodyHandle::World, pose.compose(&local0)),
            };

            let joint = Joint::spherical(BodyHandle::Dynamic(id), body1, local0, local1)
                .with_damping(self.rot_damping, self.pos_damping);
            handles.joints.push(world.add_joint(joint)?);
            handles.bodies.push(id);

            previous = Some(id);
            previous_size = size;
        }

        log::debug!(
            "built hanging chain: {} bodies, {} joints",
            handles.bodies.len(),
            handles.joints.len()
        );
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_starts_connected_except_last_link() {
        let mut world = PhysicsWorld::default();
        let chain = HangingChain::default().with_objects(5);
        let handles = chain.build(&mut world).unwrap();
        assert_eq!(handles.bodies.len(), 5);
        assert_eq!(handles.joints.len(), 5);

        let bodies = world.bodies.as_slice();
        for joint_id in &handles.joints[..4] {
            let joint = world.joint(*joint_id).unwrap();
            assert!(joint.position_error(bodies).unwrap() < 1e-5);
        }
        // the wide last box hangs from the narrow one's corner
        let last = world.joint(handles.joints[4]).unwrap();
        assert!(last.position_error(bodies).unwrap() > 0.01);
    }

    #[test]
    fn degenerate_sizes_are_reported() {
        let mut world = PhysicsWorld::default();
        let chain = HangingChain::default().with_sizes(Vec3::ZERO, Vec3::ONE);
        assert!(chain.build(&mut world).is_err());
    }
}
