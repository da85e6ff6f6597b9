use std::time::{Duration, Instant};

/// Wall-clock time spent in each phase of the substep loop.
///
/// Durations accumulate across calls until [`StepProfile::reset`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfile {
    pub integrate_time: Duration,
    pub solve_positions_time: Duration,
    pub update_time: Duration,
    pub solve_velocities_time: Duration,

    pub substeps: u64,
    pub body_count: usize,
    pub joint_count: usize,
}

impl StepProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total_time(&self) -> Duration {
        self.integrate_time
            + self.solve_positions_time
            + self.update_time
            + self.solve_velocities_time
    }

    /// Logs a per-phase breakdown at debug level.
    pub fn report(&self) {
        let total_us = self.total_time().as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        let share = |d: Duration| (d.as_micros() as f32 / total_us) * 100.0;
        log::debug!(
            "physics profile: {} bodies, {} joints, {} substeps, {:.2} ms total",
            self.body_count,
            self.joint_count,
            self.substeps,
            self.total_time().as_secs_f32() * 1000.0
        );
        log::debug!(
            "  integrate {:.1}% | solve pos {:.1}% | update {:.1}% | solve vel {:.1}%",
            share(self.integrate_time),
            share(self.solve_positions_time),
            share(self.update_time),
            share(self.solve_velocities_time)
        );
    }
}

/// Adds the lifetime of the timer to the referenced duration.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
