use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform: position plus unit-quaternion orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Applies the orientation to a direction.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        self.orientation * v
    }

    /// Undoes the orientation on a direction.
    pub fn inv_rotate(&self, v: Vec3) -> Vec3 {
        self.orientation.conjugate() * v
    }

    /// Maps a point from this pose's local frame to the parent frame.
    pub fn transform(&self, v: Vec3) -> Vec3 {
        self.rotate(v) + self.position
    }

    /// Maps a point from the parent frame into this pose's local frame.
    pub fn inv_transform(&self, v: Vec3) -> Vec3 {
        self.inv_rotate(v - self.position)
    }

    /// Re-expresses `other` (given in this pose's frame) in the parent frame, in place.
    pub fn transform_pose(&self, other: &mut Pose) {
        other.orientation = self.orientation * other.orientation;
        other.position = self.rotate(other.position) + self.position;
    }

    /// Non-mutating form of [`Pose::transform_pose`].
    pub fn compose(&self, other: &Pose) -> Pose {
        let mut out = *other;
        self.transform_pose(&mut out);
        out
    }

    /// Primary joint axis: the local X axis in the parent frame.
    pub fn axis_x(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn axis_y(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn axis_z(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}
