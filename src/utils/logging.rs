use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Simple scoped timer for profiling critical sections.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            log::trace!("end {} ({} µs)", self.label, self.start.elapsed().as_micros());
        }
    }
}

/// Logs a warning when a tick took longer than its wall-clock budget.
///
/// Returns whether the budget was exceeded.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Physics tick exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_check_compares_milliseconds() {
        assert!(warn_if_frame_budget_exceeded(Duration::from_millis(20), 16.6));
        assert!(!warn_if_frame_budget_exceeded(Duration::from_millis(5), 16.6));
    }
}
