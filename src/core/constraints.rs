use serde::{Deserialize, Serialize};

use super::pose::Pose;
use super::rigidbody::Body;
use super::types::BodyHandle;

/// Constraint family of a [`Joint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointType {
    /// Ball-and-socket: shared attachment point, optional swing and twist limits.
    Spherical,
    /// Primary (X) axes aligned; optional limit on rotation about that axis.
    Hinge,
    /// Attachment points and orientations locked together.
    Fixed,
}

/// Angular range with its own compliance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleLimit {
    pub min: f32,
    pub max: f32,
    pub compliance: f32,
}

impl AngleLimit {
    pub fn new(min: f32, max: f32, compliance: f32) -> Self {
        Self {
            min,
            max,
            compliance,
        }
    }

    /// Hard limit with zero compliance.
    pub fn rigid(min: f32, max: f32) -> Self {
        Self::new(min, max, 0.0)
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Constraint between two bodies, or between a body and the world frame.
///
/// The local poses are the attachment frames, fixed in each body at
/// creation. World-space attachment frames are derived on demand from the
/// bodies' current poses and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joint {
    pub kind: JointType,
    pub body0: BodyHandle,
    pub body1: BodyHandle,
    pub local_pose0: Pose,
    pub local_pose1: Pose,
    /// Inverse stiffness; 0 is rigid.
    pub compliance: f32,
    pub rot_damping: f32,
    pub pos_damping: f32,
    pub swing_limit: Option<AngleLimit>,
    pub twist_limit: Option<AngleLimit>,
}

impl Joint {
    pub fn new(
        kind: JointType,
        body0: BodyHandle,
        body1: BodyHandle,
        local_pose0: Pose,
        local_pose1: Pose,
    ) -> Self {
        Self {
            kind,
            body0,
            body1,
            local_pose0,
            local_pose1,
            compliance: 0.0,
            rot_damping: 0.0,
            pos_damping: 0.0,
            swing_limit: None,
            twist_limit: None,
        }
    }

    pub fn spherical(
        body0: BodyHandle,
        body1: BodyHandle,
        local_pose0: Pose,
        local_pose1: Pose,
    ) -> Self {
        Self::new(JointType::Spherical, body0, body1, local_pose0, local_pose1)
    }

    pub fn hinge(
        body0: BodyHandle,
        body1: BodyHandle,
        local_pose0: Pose,
        local_pose1: Pose,
    ) -> Self {
        Self::new(JointType::Hinge, body0, body1, local_pose0, local_pose1)
    }

    pub fn fixed(
        body0: BodyHandle,
        body1: BodyHandle,
        local_pose0: Pose,
        local_pose1: Pose,
    ) -> Self {
        Self::new(JointType::Fixed, body0, body1, local_pose0, local_pose1)
    }

    pub fn with_compliance(mut self, compliance: f32) -> Self {
        self.compliance = compliance;
        self
    }

    pub fn with_damping(mut self, rot_damping: f32, pos_damping: f32) -> Self {
        self.rot_damping = rot_damping;
        self.pos_damping = pos_damping;
        self
    }

    pub fn with_swing_limit(mut self, min: f32, max: f32, compliance: f32) -> Self {
        self.swing_limit = Some(AngleLimit::new(min, max, compliance));
        self
    }

    pub fn with_twist_limit(mut self, min: f32, max: f32, compliance: f32) -> Self {
        self.twist_limit = Some(AngleLimit::new(min, max, compliance));
        self
    }

    /// World-space attachment frames for the given body states.
    ///
    /// `None` stands for the world frame, where the local pose already is global.
    pub fn global_poses(&self, body0: Option<&Body>, body1: Option<&Body>) -> (Pose, Pose) {
        let global0 = match body0 {
            Some(body) => body.pose.compose(&self.local_pose0),
            None => self.local_pose0,
        };
        let global1 = match body1 {
            Some(body) => body.pose.compose(&self.local_pose1),
            None => self.local_pose1,
        };
        (global0, global1)
    }
}
