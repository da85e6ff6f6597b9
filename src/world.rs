pub mod pose_buffer;

use glam::Vec3;

use crate::{
    config::{validate_step, SimulationConfig, DEFAULT_TIME_STEP},
    core::{
        constraints::Joint,
        pose::Pose,
        rigidbody::Body,
        types::{BodyHandle, VisualHandle},
    },
    dynamics::substep::simulate_with_config,
    error::{PhysicsError, Result},
    utils::{
        allocator::{Arena, BodyId, JointId},
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
        profiling::StepProfile,
    },
};

/// Owns the bodies and joints of a scene and advances them in fixed ticks.
pub struct PhysicsWorld {
    pub bodies: Arena<BodyId, Body>,
    pub joints: Arena<JointId, Joint>,
    pub time_accumulated: f32,
    config: SimulationConfig,
    ticks: u64,
    profile: StepProfile,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_valid_config(SimulationConfig::default())
    }
}

impl PhysicsWorld {
    /// World with default settings and the given tick length.
    ///
    /// Invalid tick lengths fall back to [`DEFAULT_TIME_STEP`].
    pub fn new(time_step: f32) -> Self {
        let ts = if time_step.is_finite() && time_step > 0.0 {
            time_step
        } else {
            log::warn!("invalid time step {time_step}, using {DEFAULT_TIME_STEP}");
            DEFAULT_TIME_STEP
        };
        Self::from_valid_config(SimulationConfig::default().with_time_step(ts))
    }

    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SimulationConfig) -> Self {
        log::debug!(
            "physics world: time step {:.5} s, {} substeps, gravity {:?}",
            config.time_step,
            config.num_substeps,
            config.gravity
        );
        Self {
            bodies: Arena::new(),
            joints: Arena::new(),
            time_accumulated: 0.0,
            config,
            ticks: 0,
            profile: StepProfile::default(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        if let Err(err) = config.validate() {
            log::warn!("rejected simulation config: {err}");
            return Err(err);
        }
        log::debug!("simulation config updated: {config:?}");
        self.config = config;
        Ok(())
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    pub fn set_substeps(&mut self, num_substeps: u32) -> Result<()> {
        self.set_config(self.config.with_substeps(num_substeps))
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.config.parallel = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.config.parallel
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = self.bodies.insert(body);
        log::debug!("added body {id:?}");
        id
    }

    /// Adds a joint after checking that both ends exist and differ.
    pub fn add_joint(&mut self, joint: Joint) -> Result<JointId> {
        for handle in [joint.body0, joint.body1] {
            if let BodyHandle::Dynamic(id) = handle {
                if !self.bodies.contains(id) {
                    return Err(PhysicsError::UnknownBody(id));
                }
            }
        }
        if let (BodyHandle::Dynamic(a), BodyHandle::Dynamic(b)) = (joint.body0, joint.body1) {
            if a == b {
                return Err(PhysicsError::SelfJoint(a));
            }
        }

        let kind = joint.kind;
        let id = self.joints.insert(joint);
        log::debug!("added {kind:?} joint {id:?}");
        Ok(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id)
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn simulated_time(&self) -> f64 {
        self.ticks as f64 * self.config.time_step as f64
    }

    pub fn profile(&self) -> &StepProfile {
        &self.profile
    }

    pub fn reset_profile(&mut self) {
        self.profile.reset();
    }

    /// Runs exactly one tick of `config().time_step`.
    pub fn tick(&mut self) -> Result<()> {
        let timer = ScopedTimer::new("world::tick");
        simulate_with_config(
            self.bodies.as_mut_slice(),
            self.joints.as_slice(),
            &self.config,
            &mut self.profile,
        )?;
        self.ticks += 1;
        warn_if_frame_budget_exceeded(timer.elapsed(), self.config.frame_budget_ms);
        Ok(())
    }

    /// Advances the simulation using a fixed timestep accumulator.
    ///
    /// Returns the number of ticks executed.
    pub fn step(&mut self, dt: f32) -> Result<u32> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        validate_step(self.config.time_step, self.config.num_substeps)?;

        self.time_accumulated += dt;
        let mut executed = 0;
        while self.time_accumulated >= self.config.time_step {
            self.time_accumulated -= self.config.time_step;
            self.tick()?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Current poses of all bodies that carry a visual handle.
    pub fn visual_poses(&self) -> impl Iterator<Item = (VisualHandle, Pose)> + '_ {
        self.bodies
            .iter()
            .filter_map(|body| body.visual.map(|visual| (visual, body.pose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_step_falls_back_to_default() {
        let world = PhysicsWorld::new(-1.0);
        assert_eq!(world.config().time_step, DEFAULT_TIME_STEP);
    }

    #[test]
    fn add_joint_validates_handles() {
        let mut world = PhysicsWorld::default();
        let a = world.add_body(Body::default());

        let missing = Joint::spherical(
            BodyHandle::Dynamic(a),
            BodyHandle::Dynamic(BodyId(9)),
            Pose::IDENTITY,
            Pose::IDENTITY,
        );
        assert!(matches!(
            world.add_joint(missing),
            Err(PhysicsError::UnknownBody(BodyId(9)))
        ));

        let looped = Joint::hinge(a.into(), a.into(), Pose::IDENTITY, Pose::IDENTITY);
        assert!(matches!(world.add_joint(looped), Err(PhysicsError::SelfJoint(_))));

        let ok = Joint::fixed(BodyHandle::World, a.into(), Pose::IDENTITY, Pose::IDENTITY);
        assert_eq!(world.add_joint(ok).unwrap(), JointId(0));
    }

    #[test]
    fn accumulator_runs_whole_ticks_only() {
        let mut world = PhysicsWorld::with_config(
            SimulationConfig::default()
                .with_time_step(0.01)
                .with_substeps(2),
        )
        .unwrap();
        world.add_body(Body::default());

        assert_eq!(world.step(0.005).unwrap(), 0);
        assert_eq!(world.step(0.026).unwrap(), 3);
        assert_eq!(world.ticks(), 3);
        assert!(world.step(f32::NAN).is_err());
    }

    #[test]
    fn visual_poses_skip_bodies_without_visuals() {
        let mut world = PhysicsWorld::default();
        world.add_body(Body::default());
        world.add_body(Body::new(Pose::from_position(Vec3::Y), Some(VisualHandle(42))));

        let visuals: Vec<_> = world.visual_poses().collect();
        assert_eq!(visuals.len(), 1);
        assert_eq!(visuals[0].0, VisualHandle(42));
        assert_eq!(visuals[0].1.position, Vec3::Y);
    }
}
