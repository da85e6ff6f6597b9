//! The substep driver.
//!
//! Each substep runs four phases in a fixed order: predict poses, project
//! joint positions, derive velocities from the corrected poses, damp joint
//! velocities. Joints are always visited in caller order.

use glam::Vec3;

use crate::{
    config::SimulationConfig,
    core::{constraints::Joint, rigidbody::Body},
    error::Result,
    utils::profiling::{PhaseTimer, StepProfile},
};

use super::integrator::Integrator;

/// Advances `bodies` by one tick of `time_step`, split into `num_substeps`.
///
/// Fails without touching any body when `time_step` is not a positive finite
/// number or `num_substeps` is zero.
pub fn simulate(
    bodies: &mut [Body],
    joints: &[Joint],
    time_step: f32,
    num_substeps: u32,
    gravity: Vec3,
) -> Result<()> {
    let config = SimulationConfig {
        time_step,
        num_substeps,
        gravity,
        ..SimulationConfig::default()
    };
    let mut profile = StepProfile::default();
    simulate_with_config(bodies, joints, &config, &mut profile)
}

/// [`simulate`] driven by a [`SimulationConfig`], accumulating phase timings into `profile`.
pub fn simulate_with_config(
    bodies: &mut [Body],
    joints: &[Joint],
    config: &SimulationConfig,
    profile: &mut StepProfile,
) -> Result<()> {
    config.validate()?;

    let dt = config.substep_dt();
    let integrator = Integrator::new(config.parallel);
    profile.body_count = bodies.len();
    profile.joint_count = joints.len();

    for _ in 0..config.num_substeps {
        {
            let _timer = PhaseTimer::new(&mut profile.integrate_time);
            integrator.integrate_all(bodies, dt, config.gravity);
        }
        {
            let _timer = PhaseTimer::new(&mut profile.solve_positions_time);
            for joint in joints {
                joint.solve_pos(bodies, dt);
            }
        }
        {
            let _timer = PhaseTimer::new(&mut profile.update_time);
            integrator.update_all(bodies, dt);
        }
        {
            let _timer = PhaseTimer::new(&mut profile.solve_velocities_time);
            for joint in joints {
                joint.solve_vel(bodies, dt);
            }
        }
        profile.substeps += 1;
    }

    Ok(())
}
