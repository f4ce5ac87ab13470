use std::time::Duration;

/// Outcome of every run of one configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialSample {
    /// Wall-clock seconds of the successful runs, in run order.
    pub durations: Vec<f64>,
    pub failures: u32,
}

impl TrialSample {
    pub fn new(durations: Vec<f64>, failures: u32) -> Self {
        Self {
            durations,
            failures,
        }
    }

    pub fn record_success(&mut self, elapsed: Duration) {
        self.durations.push(elapsed.as_secs_f64());
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn successes(&self) -> u32 {
        self.durations.len() as u32
    }

    pub fn attempts(&self) -> u32 {
        self.successes() + self.failures
    }

    pub fn all_failed(&self) -> bool {
        self.durations.is_empty()
    }
}
