//! Global configuration constants and the serializable simulation settings.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -10.0, 0.0];

/// Default tick length (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Number of substeps each tick is divided into.
pub const DEFAULT_NUM_SUBSTEPS: u32 = 40;

/// Largest rotation (radians) a single `apply_rotation` call may perform.
pub const MAX_ROTATION_PER_SUBSTEP: f32 = 0.5;

/// Density used by `Body::set_box_default_density`.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Corrections shorter than this have no usable direction.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Wall-clock budget of one tick before a warning is logged.
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.6;

/// Settings consumed by [`crate::dynamics::substep::simulate_with_config`] and the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one tick in seconds.
    pub time_step: f32,
    /// Substeps per tick; more substeps trade speed for accuracy.
    pub num_substeps: u32,
    pub gravity: Vec3,
    /// Run the per-body phases on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
    pub frame_budget_ms: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            num_substeps: DEFAULT_NUM_SUBSTEPS,
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            parallel: false,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl SimulationConfig {
    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_substeps(mut self, num_substeps: u32) -> Self {
        self.num_substeps = num_substeps;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks the boundary contract of the substep driver.
    pub fn validate(&self) -> Result<()> {
        validate_step(self.time_step, self.num_substeps)
    }

    /// Length of a single substep.
    pub fn substep_dt(&self) -> f32 {
        self.time_step / self.num_substeps.max(1) as f32
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub(crate) fn validate_step(time_step: f32, num_substeps: u32) -> Result<()> {
    if !time_step.is_finite() || time_step <= 0.0 {
        return Err(PhysicsError::InvalidTimeStep(time_step));
    }
    if num_substeps == 0 {
        return Err(PhysicsError::InvalidSubstepCount(num_substeps));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_scene() {
        let config = SimulationConfig::default();
        assert_eq!(config.num_substeps, 40);
        assert_eq!(config.gravity, Vec3::new(0.0, -10.0, 0.0));
        assert!((config.substep_dt() - 1.0 / 2400.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = SimulationConfig::from_json(r#"{ "num_substeps": 10 }"#).unwrap();
        assert_eq!(config.num_substeps, 10);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);

        let text = config.to_json().unwrap();
        assert_eq!(SimulationConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_step_parameters() {
        assert!(matches!(
            SimulationConfig::default().with_time_step(0.0).validate(),
            Err(PhysicsError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            SimulationConfig::default().with_time_step(f32::NAN).validate(),
            Err(PhysicsError::InvalidTimeStep(_))
        ));
        assert!(matches!(
            SimulationConfig::default().with_substeps(0).validate(),
            Err(PhysicsError::InvalidSubstepCount(0))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "num_substeps": 0 }"#),
            Err(PhysicsError::InvalidSubstepCount(0))
        ));
        assert!(matches!(
            SimulationConfig::from_json("not json"),
            Err(PhysicsError::Config(_))
        ));
    }
}
