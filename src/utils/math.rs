//! Additional math helpers layered on top of `glam`.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use crate::config::NORMALIZE_EPSILON;

/// Normalizes `v`, returning zero when it is too short to carry a direction.
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length < NORMALIZE_EPSILON {
        Vec3::ZERO
    } else {
        v / length
    }
}

/// Normalizes `v`, falling back to `fallback` when it is too short.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length = v.length();
    if length < NORMALIZE_EPSILON {
        fallback
    } else {
        v / length
    }
}

/// Rotation vector (axis * angle, small-angle form) taking `from` to `to`.
///
/// Uses `2 * imag(to * from⁻¹)`, flipped when the real part is negative so the
/// shorter of the two equivalent rotations is chosen.
pub fn rotation_delta(to: Quat, from: Quat) -> Vec3 {
    let dq = to * from.conjugate();
    let omega = 2.0 * Vec3::new(dq.x, dq.y, dq.z);
    if dq.w < 0.0 {
        -omega
    } else {
        omega
    }
}

/// Wraps an angle into (-π, π].
pub fn wrap_angle(mut phi: f32) -> f32 {
    if phi > PI {
        phi -= 2.0 * PI;
    }
    if phi <= -PI {
        phi += 2.0 * PI;
    }
    phi
}

/// Signed angle from `a` to `b` about the axis `n`.
///
/// `a` and `b` are expected to be unit vectors perpendicular (or close to it) to `n`.
pub fn signed_angle(n: Vec3, a: Vec3, b: Vec3) -> f32 {
    let sin_phi = a.cross(b).dot(n).clamp(-1.0, 1.0);
    let mut phi = sin_phi.asin();
    if a.dot(b) < 0.0 {
        phi = PI - phi;
    }
    wrap_angle(phi)
}
