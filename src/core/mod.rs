//! Core types: poses, bodies, joints and their handles.

pub mod constraints;
pub mod pose;
pub mod rigidbody;
pub mod types;

pub use constraints::{AngleLimit, Joint, JointType};
pub use pose::Pose;
pub use rigidbody::Body;
pub use types::{BodyHandle, MassProperties, VisualHandle};
