//! Per-step metrics for the world integrator.

/// Timing and size data collected during a single step.
///
/// Durations are in microseconds. The world overwrites these after every
/// `update()`; read them through `World::last_metrics()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Per-force application times: `(name, microseconds)`, in
    /// application order. Skipped forces are not listed.
    pub force_us: Vec<(String, u64)>,
    /// Forces applied this step.
    pub active_forces: usize,
    /// Forces skipped because their window excluded the current time or
    /// their selection was empty.
    pub skipped_forces: usize,
    /// Bodies integrated.
    pub body_count: usize,
    /// Store row capacity after the step.
    pub capacity: usize,
    /// Memory used by the body columns, in bytes.
    pub memory_bytes: usize,
    /// Step length.
    pub dt: f64,
}

/// Outcome of `World::run_for`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Number of full-length steps taken.
    pub full_steps: u64,
    /// Length of the final partial step; 0 when the duration was an exact
    /// multiple of the timestep.
    pub remainder: f64,
    /// Whether the partial step was taken.
    pub remainder_applied: bool,
}

impl RunSummary {
    /// Total number of `update()` calls.
    pub fn steps(&self) -> u64 {
        self.full_steps + u64::from(self.remainder_applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.force_us.is_empty());
        assert_eq!(m.active_forces, 0);
        assert_eq!(m.skipped_forces, 0);
        assert_eq!(m.body_count, 0);
        assert_eq!(m.memory_bytes, 0);
        assert_eq!(m.dt, 0.0);
    }

    #[test]
    fn summary_counts_partial_step() {
        let s = RunSummary {
            full_steps: 3,
            remainder: 0.1,
            remainder_applied: true,
        };
        assert_eq!(s.steps(), 4);
        assert_eq!(RunSummary::default().steps(), 0);
    }
}
