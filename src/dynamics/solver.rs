//! XPBD constraint projection: the shared two-body correction, angle limits,
//! and the per-joint position and velocity passes.
//!
//! Every degenerate case (zero-length correction, zero total inverse mass,
//! unresolvable joint ends) is a silent no-op so one bad joint cannot disturb
//! the rest of the tick.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::{
    core::{
        constraints::{Joint, JointType},
        pose::Pose,
        rigidbody::Body,
        types::BodyHandle,
    },
    utils::{
        allocator::pair_mut,
        math::{normalize_or, rotation_delta, safe_normalize, signed_angle},
    },
};

/// Mutable access to the two ends of a joint. `None` is the world frame.
pub struct BodyPair<'a> {
    pub body0: Option<&'a mut Body>,
    pub body1: Option<&'a mut Body>,
}

impl<'a> BodyPair<'a> {
    /// Borrows the bodies named by two handles.
    ///
    /// Fails when a handle is out of range or both handles name the same body.
    pub fn resolve(bodies: &'a mut [Body], h0: BodyHandle, h1: BodyHandle) -> Option<Self> {
        match (h0, h1) {
            (BodyHandle::World, BodyHandle::World) => Some(Self {
                body0: None,
                body1: None,
            }),
            (BodyHandle::Dynamic(a), BodyHandle::World) => {
                bodies.get_mut(a.0 as usize).map(|body| Self {
                    body0: Some(body),
                    body1: None,
                })
            }
            (BodyHandle::World, BodyHandle::Dynamic(b)) => {
                bodies.get_mut(b.0 as usize).map(|body| Self {
                    body0: None,
                    body1: Some(body),
                })
            }
            (BodyHandle::Dynamic(a), BodyHandle::Dynamic(b)) => {
                pair_mut(bodies, a.0 as usize, b.0 as usize).map(|(x, y)| Self {
                    body0: Some(x),
                    body1: Some(y),
                })
            }
        }
    }

    fn global_poses(&self, joint: &Joint) -> (Pose, Pose) {
        joint.global_poses(self.body0.as_deref(), self.body1.as_deref())
    }

    #[allow(clippy::too_many_arguments)]
    fn correct(
        &mut self,
        corr: Vec3,
        compliance: f32,
        dt: f32,
        pos0: Option<Vec3>,
        pos1: Option<Vec3>,
        velocity_level: bool,
    ) {
        apply_body_pair_correction(
            self.body0.as_deref_mut(),
            self.body1.as_deref_mut(),
            corr,
            compliance,
            dt,
            pos0,
            pos1,
            velocity_level,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn limit(
        &mut self,
        n: Vec3,
        a: Vec3,
        b: Vec3,
        min_angle: f32,
        max_angle: f32,
        compliance: f32,
        dt: f32,
        max_corr: f32,
    ) -> bool {
        limit_angle(
            self.body0.as_deref_mut(),
            self.body1.as_deref_mut(),
            n,
            a,
            b,
            min_angle,
            max_angle,
            compliance,
            dt,
            max_corr,
        )
    }
}

/// Two-body Lagrange-multiplier step shared by every constraint.
///
/// `corr` points from body0's side to body1's side; its length is the
/// constraint violation. With `pos0`/`pos1` the correction acts at those
/// world points, otherwise it is a pure rotation. With zero compliance the
/// constraint is rigid.
#[allow(clippy::too_many_arguments)]
pub fn apply_body_pair_correction(
    body0: Option<&mut Body>,
    body1: Option<&mut Body>,
    corr: Vec3,
    compliance: f32,
    dt: f32,
    pos0: Option<Vec3>,
    pos1: Option<Vec3>,
    velocity_level: bool,
) {
    let c = corr.length();
    if c == 0.0 {
        return;
    }

    let normal = safe_normalize(corr);

    let w0 = body0
        .as_deref()
        .map_or(0.0, |body| body.inverse_mass(normal, pos0));
    let w1 = body1
        .as_deref()
        .map_or(0.0, |body| body.inverse_mass(normal, pos1));

    let w = w0 + w1;
    if w == 0.0 {
        return;
    }

    let lambda = -c / (w + compliance / (dt * dt));
    let impulse = normal * -lambda;

    if let Some(body) = body0 {
        body.apply_correction(impulse, pos0, velocity_level);
    }
    if let Some(body) = body1 {
        body.apply_correction(-impulse, pos1, velocity_level);
    }
}

/// Keeps the angle from `a` to `b` about `n` inside `[min_angle, max_angle]`.
///
/// Returns whether the limit was violated and a correction applied. The
/// rotation fed to the bodies is capped at `max_corr`.
#[allow(clippy::too_many_arguments)]
pub fn limit_angle(
    body0: Option<&mut Body>,
    body1: Option<&mut Body>,
    n: Vec3,
    a: Vec3,
    b: Vec3,
    min_angle: f32,
    max_angle: f32,
    compliance: f32,
    dt: f32,
    max_corr: f32,
) -> bool {
    let phi = signed_angle(n, a, b);
    if phi >= min_angle && phi <= max_angle {
        return false;
    }

    let clamped = phi.max(min_angle).min(max_angle);
    let target = Quat::from_axis_angle(n, clamped) * a;

    let mut omega = target.cross(b);
    let magnitude = omega.length();
    if magnitude > max_corr {
        omega *= max_corr / magnitude;
    }

    apply_body_pair_correction(body0, body1, omega, compliance, dt, None, None, false);
    true
}

/// Swing axis and the two primary axes of a spherical joint.
fn swing_frame(global0: &Pose, global1: &Pose) -> (Vec3, Vec3, Vec3) {
    let a0 = global0.axis_x();
    let a1 = global1.axis_x();
    let n = normalize_or(a0.cross(a1), a0.any_orthonormal_vector());
    (n, a0, a1)
}

struct TwistFrame {
    axis: Vec3,
    a0: Vec3,
    a1: Vec3,
    /// Correction cap before multiplying by the substep length.
    max_corr_rate: f32,
}

/// Twist axis halfway between the primary axes, with the secondary axes
/// projected onto its normal plane. `None` when a projection vanishes.
fn twist_frame(global0: &Pose, global1: &Pose) -> Option<TwistFrame> {
    let n0 = global0.axis_x();
    let n1 = global1.axis_x();
    let axis = normalize_or(n0 + n1, n0.any_orthonormal_vector());

    let a0 = global0.axis_y();
    let a0 = safe_normalize(a0 - axis * axis.dot(a0));
    let a1 = global1.axis_y();
    let a1 = safe_normalize(a1 - axis * axis.dot(a1));
    if a0 == Vec3::ZERO || a1 == Vec3::ZERO {
        return None;
    }

    // Near anti-parallel primary axes make the twist axis unstable.
    let max_corr_rate = if n0.dot(n1) > -0.5 { 2.0 * PI } else { 1.0 };

    Some(TwistFrame {
        axis,
        a0,
        a1,
        max_corr_rate,
    })
}

impl Joint {
    /// Position-level projection for one substep.
    pub fn solve_pos(&self, bodies: &mut [Body], dt: f32) {
        if let Some(mut pair) = BodyPair::resolve(bodies, self.body0, self.body1) {
            self.solve_pos_pair(&mut pair, dt);
        }
    }

    /// Velocity-level damping for one substep.
    pub fn solve_vel(&self, bodies: &mut [Body], dt: f32) {
        if let Some(mut pair) = BodyPair::resolve(bodies, self.body0, self.body1) {
            self.solve_vel_pair(&mut pair, dt);
        }
    }

    pub fn solve_pos_pair(&self, pair: &mut BodyPair<'_>, dt: f32) {
        let (global0, global1) = pair.global_poses(self);

        match self.kind {
            JointType::Fixed => {
                let omega = rotation_delta(global1.orientation, global0.orientation);
                pair.correct(omega, self.compliance, dt, None, None, false);
            }
            JointType::Hinge => {
                let align = global0.axis_x().cross(global1.axis_x());
                pair.correct(align, 0.0, dt, None, None, false);

                if let Some(limit) = self.swing_limit {
                    let (global0, global1) = pair.global_poses(self);
                    pair.limit(
                        global0.axis_x(),
                        global0.axis_y(),
                        global1.axis_y(),
                        limit.min,
                        limit.max,
                        limit.compliance,
                        dt,
                        PI,
                    );
                }
            }
            JointType::Spherical => {
                if let Some(limit) = self.swing_limit {
                    let (global0, global1) = pair.global_poses(self);
                    let (n, a0, a1) = swing_frame(&global0, &global1);
                    pair.limit(
                        n,
                        a0,
                        a1,
                        limit.min,
                        limit.max,
                        limit.compliance,
                        dt,
                        PI,
                    );
                }

                if let Some(limit) = self.twist_limit {
                    let (global0, global1) = pair.global_poses(self);
                    if let Some(frame) = twist_frame(&global0, &global1) {
                        pair.limit(
                            frame.axis,
                            frame.a0,
                            frame.a1,
                            limit.min,
                            limit.max,
                            limit.compliance,
                            dt,
                            frame.max_corr_rate * dt,
                        );
                    }
                }
            }
        }

        let (global0, global1) = pair.global_poses(self);
        let corr = global1.position - global0.position;
        pair.correct(
            corr,
            self.compliance,
            dt,
            Some(global0.position),
            Some(global1.position),
            false,
        );
    }

    /// Damping never removes more relative velocity than there is: each
    /// correction is scaled by `min(1, damping * dt)`.
    pub fn solve_vel_pair(&self, pair: &mut BodyPair<'_>, dt: f32) {
        if self.rot_damping > 0.0 {
            let mut omega = Vec3::ZERO;
            if let Some(body) = pair.body0.as_deref() {
                omega -= body.omega;
            }
            if let Some(body) = pair.body1.as_deref() {
                omega += body.omega;
            }
            omega *= (self.rot_damping * dt).min(1.0);
            pair.correct(omega, 0.0, dt, None, None, true);
        }

        if self.pos_damping > 0.0 {
            let (global0, global1) = pair.global_poses(self);
            let mut vel = Vec3::ZERO;
            if let Some(body) = pair.body0.as_deref() {
                vel -= body.velocity_at(global0.position);
            }
            if let Some(body) = pair.body1.as_deref() {
                vel += body.velocity_at(global1.position);
            }
            vel *= (self.pos_damping * dt).min(1.0);
            pair.correct(
                vel,
                0.0,
                dt,
                Some(global0.position),
                Some(global1.position),
                true,
            );
        }
    }

    /// Current swing angle: about the hinge axis for hinges, between the
    /// primary axes for spherical joints. `None` for fixed joints or
    /// unresolvable ends.
    pub fn swing_angle(&self, bodies: &[Body]) -> Option<f32> {
        let (global0, global1) = self.lookup_global_poses(bodies)?;
        match self.kind {
            JointType::Hinge => Some(signed_angle(
                global0.axis_x(),
                global0.axis_y(),
                global1.axis_y(),
            )),
            JointType::Spherical => {
                let (n, a0, a1) = swing_frame(&global0, &global1);
                Some(signed_angle(n, a0, a1))
            }
            JointType::Fixed => None,
        }
    }

    /// Current twist angle of a spherical joint.
    pub fn twist_angle(&self, bodies: &[Body]) -> Option<f32> {
        if self.kind != JointType::Spherical {
            return None;
        }
        let (global0, global1) = self.lookup_global_poses(bodies)?;
        let frame = twist_frame(&global0, &global1)?;
        Some(signed_angle(frame.axis, frame.a0, frame.a1))
    }

    /// Distance between the two world-space attachment points.
    pub fn position_error(&self, bodies: &[Body]) -> Option<f32> {
        let (global0, global1) = self.lookup_global_poses(bodies)?;
        Some((global1.position - global0.position).length())
    }

    fn lookup_global_poses(&self, bodies: &[Body]) -> Option<(Pose, Pose)> {
        let lookup = |handle: BodyHandle| match handle {
            BodyHandle::World => Some(None),
            BodyHandle::Dynamic(id) => bodies.get(id.0 as usize).map(Some),
        };
        let body0 = lookup(self.body0)?;
        let body1 = lookup(self.body1)?;
        Some(self.global_poses(body0, body1))
    }
}
