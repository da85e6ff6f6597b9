//! XPBD Joints – substepped position-based rigid-body dynamics for Rust.
//!
//! Rigid bodies are linked by spherical, hinge and fixed joints with optional
//! swing and twist limits. Each tick is split into substeps; every substep
//! predicts poses, projects the joints at position level, re-derives
//! velocities from the corrected poses and finally applies joint damping.
//!
//! The free function [`simulate`] works on caller-owned slices.
//! [`PhysicsWorld`] owns the bodies and joints and adds a fixed-timestep
//! accumulator on top.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod scene;
pub mod utils;
pub mod world;

pub use glam::{Quat, Vec3};

pub use config::SimulationConfig;
pub use crate::core::{
    constraints::{AngleLimit, Joint, JointType},
    pose::Pose,
    rigidbody::Body,
    types::{BodyHandle, MassProperties, VisualHandle},
};
pub use dynamics::{
    integrator::Integrator,
    solver::{apply_body_pair_correction, limit_angle, BodyPair},
    substep::{simulate, simulate_with_config},
};
pub use error::{PhysicsError, Result};
pub use scene::{ChainHandles, HangingChain};
pub use utils::allocator::{Arena, BodyId, JointId};
pub use utils::profiling::StepProfile;
pub use world::{
    pose_buffer::{PoseBuffer, PoseSnapshot},
    PhysicsWorld,
};

/// High-level convenience wrapper that owns a [`PhysicsWorld`].
pub struct PhysicsEngine {
    world: PhysicsWorld,
}

impl PhysicsEngine {
    /// Creates a new physics engine with the provided fixed timestep.
    pub fn new(timestep: f32) -> Self {
        Self {
            world: PhysicsWorld::new(timestep),
        }
    }

    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        Ok(Self {
            world: PhysicsWorld::with_config(config)?,
        })
    }

    /// Adds a rigid body to the world and returns its [`BodyId`].
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.world.add_body(body)
    }

    /// Adds a joint; both ends must already exist.
    pub fn add_joint(&mut self, joint: Joint) -> Result<JointId> {
        self.world.add_joint(joint)
    }

    /// Advances the simulation by the provided delta time.
    pub fn step(&mut self, dt: f32) -> Result<u32> {
        self.world.step(dt)
    }

    /// Enables or disables parallel execution of the per-body phases.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.world.set_parallel_enabled(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.world.parallel_enabled()
    }

    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.world.body(id)
    }

    pub fn get_body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.world.body_mut(id)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }
}
