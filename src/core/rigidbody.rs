use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::pose::Pose;
use super::types::{MassProperties, VisualHandle};
use crate::config::{DEFAULT_DENSITY, MAX_ROTATION_PER_SUBSTEP};
use crate::error::Result;
use crate::utils::math::rotation_delta;

/// Simulated rigid body.
///
/// Velocities are not integrated from forces alone: after the constraint
/// solve, [`Body::update`] re-derives them from how far the pose moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pose: Pose,
    /// Pose at the start of the current substep.
    pub prev_pose: Pose,
    /// Pose at creation.
    pub orig_pose: Pose,
    pub vel: Vec3,
    pub omega: Vec3,
    pub inv_mass: f32,
    /// Diagonal of the inverse inertia tensor, body space.
    pub inv_inertia: Vec3,
    pub visual: Option<VisualHandle>,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Pose::IDENTITY, None)
    }
}

impl Body {
    pub fn new(pose: Pose, visual: Option<VisualHandle>) -> Self {
        let defaults = MassProperties::default();
        Self {
            pose,
            prev_pose: pose,
            orig_pose: pose,
            vel: Vec3::ZERO,
            omega: Vec3::ZERO,
            inv_mass: defaults.inverse_mass,
            inv_inertia: defaults.inverse_inertia,
            visual,
        }
    }

    /// Immovable body: zero inverse mass and inertia.
    pub fn fixed(pose: Pose, visual: Option<VisualHandle>) -> Self {
        let mut body = Self::new(pose, visual);
        body.set_mass_properties(MassProperties::STATIC);
        body
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Derives mass and inertia from a solid box. The body is left untouched on error.
    pub fn set_box(&mut self, size: Vec3, density: f32) -> Result<()> {
        let props = MassProperties::solid_box(size, density)?;
        self.set_mass_properties(props);
        Ok(())
    }

    pub fn set_box_default_density(&mut self, size: Vec3) -> Result<()> {
        self.set_box(size, DEFAULT_DENSITY)
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.inv_mass = props.inverse_mass;
        self.inv_inertia = props.inverse_inertia;
    }

    pub fn mass_properties(&self) -> MassProperties {
        MassProperties {
            inverse_mass: self.inv_mass,
            inverse_inertia: self.inv_inertia,
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass_properties().is_static()
    }

    /// Mass, or `f32::INFINITY` for a body that cannot translate.
    pub fn mass(&self) -> f32 {
        if self.inv_mass == 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.inv_mass
        }
    }

    pub fn set_velocity(&mut self, linear: Vec3, angular: Vec3) {
        self.vel = linear;
        self.omega = angular;
    }

    pub fn kinetic_energy(&self) -> f32 {
        let mut energy = 0.0;
        if self.inv_mass > 0.0 {
            energy += 0.5 * self.vel.length_squared() / self.inv_mass;
        }
        let local_omega = self.pose.inv_rotate(self.omega);
        for axis in 0..3 {
            if self.inv_inertia[axis] > 0.0 {
                energy += 0.5 * local_omega[axis] * local_omega[axis] / self.inv_inertia[axis];
            }
        }
        energy
    }

    /// Rotates the orientation by the rotation vector `rot * scale`.
    ///
    /// First-order quaternion update followed by renormalization; the step is
    /// clamped to [`MAX_ROTATION_PER_SUBSTEP`].
    pub fn apply_rotation(&mut self, rot: Vec3, scale: f32) {
        let mut scale = scale;
        let phi = rot.length();
        if phi * scale > MAX_ROTATION_PER_SUBSTEP {
            scale = MAX_ROTATION_PER_SUBSTEP / phi;
        }

        let q = self.pose.orientation;
        let scaled = rot * scale;
        let dq = Quat::from_xyzw(scaled.x, scaled.y, scaled.z, 0.0) * q;
        self.pose.orientation = Quat::from_xyzw(
            q.x + 0.5 * dq.x,
            q.y + 0.5 * dq.y,
            q.z + 0.5 * dq.z,
            q.w + 0.5 * dq.w,
        )
        .normalize();
    }

    /// Symplectic Euler prediction for one substep.
    pub fn integrate(&mut self, dt: f32, gravity: Vec3) {
        self.prev_pose = self.pose;
        if self.is_static() {
            return;
        }

        self.vel += gravity * dt;
        self.pose.position += self.vel * dt;
        self.apply_rotation(self.omega, dt);
    }

    /// Recomputes velocities from the pose change of the finished substep.
    pub fn update(&mut self, dt: f32) {
        self.vel = (self.pose.position - self.prev_pose.position) / dt;
        self.omega = rotation_delta(self.pose.orientation, self.prev_pose.orientation) / dt;
    }

    /// Velocity of the material point currently at `point`.
    pub fn velocity_at(&self, point: Vec3) -> Vec3 {
        self.vel + self.omega.cross(point - self.pose.position)
    }

    /// Generalized inverse mass along `normal`.
    ///
    /// With `pos`, the correction acts at that world point and includes the
    /// translational term; without it, `normal` is a pure rotation axis.
    pub fn inverse_mass(&self, normal: Vec3, pos: Option<Vec3>) -> f32 {
        let n = match pos {
            Some(p) => (p - self.pose.position).cross(normal),
            None => normal,
        };
        let n = self.pose.inv_rotate(n);

        let mut w = n.x * n.x * self.inv_inertia.x
            + n.y * n.y * self.inv_inertia.y
            + n.z * n.z * self.inv_inertia.z;

        if pos.is_some() {
            w += self.inv_mass;
        }
        w
    }

    /// Applies a positional (or, with `velocity_level`, velocity) correction.
    pub fn apply_correction(&mut self, corr: Vec3, pos: Option<Vec3>, velocity_level: bool) {
        if self.is_static() {
            return;
        }

        let dq = match pos {
            Some(p) => {
                if velocity_level {
                    self.vel += corr * self.inv_mass;
                } else {
                    self.pose.position += corr * self.inv_mass;
                }
                (p - self.pose.position).cross(corr)
            }
            None => corr,
        };

        let dq = self.pose.inv_rotate(dq) * self.inv_inertia;
        let dq = self.pose.rotate(dq);

        if velocity_level {
            self.omega += dq;
        } else {
            self.apply_rotation(dq, 1.0);
        }
    }
}
