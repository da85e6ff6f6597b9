//! Simulation dynamics: per-body integration, joint projection and the substep driver.

pub mod integrator;
pub mod parallel;
pub mod solver;
pub mod substep;

pub use integrator::Integrator;
pub use solver::{apply_body_pair_correction, limit_angle, BodyPair};
pub use substep::{simulate, simulate_with_config};
