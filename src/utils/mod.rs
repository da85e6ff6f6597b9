//! Utility helpers including math extensions, arena handles, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, ArenaId, BodyId, JointId};
pub use math::*;
pub use profiling::StepProfile;
