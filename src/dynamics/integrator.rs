use glam::Vec3;

use crate::core::rigidbody::Body;

use super::parallel::for_each_body;

/// Runs the two per-body phases of a substep over all bodies.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    parallel: bool,
}

impl Integrator {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Predicts every body's pose for the substep.
    pub fn integrate_all(&self, bodies: &mut [Body], dt: f32, gravity: Vec3) {
        for_each_body(bodies, self.parallel, |body| body.integrate(dt, gravity));
    }

    /// Derives every body's velocities from its corrected pose.
    pub fn update_all(&self, bodies: &mut [Body], dt: f32) {
        for_each_body(bodies, self.parallel, |body| body.update(dt));
    }
}
