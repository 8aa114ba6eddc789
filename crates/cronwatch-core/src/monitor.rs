use serde::{Deserialize, Serialize};

use crate::job::MonitoredJob;

/// Monitoring parameters attached to a job type.
///
/// All durations are in minutes. A job type that declares nothing is
/// monitored with [`MonitorConfig::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Minutes a check-in may be late before it counts as missed.
    pub checkin_margin: u32,
    /// Minutes a run may stay in progress before it counts as stuck.
    pub max_runtime: u32,
    /// Consecutive failures before the backend raises an issue.
    pub failure_issue_threshold: u32,
    /// Consecutive successes before the backend resolves the issue.
    pub recovery_threshold: u32,
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        checkin_margin: 1,
        max_runtime: 30,
        failure_issue_threshold: 1,
        recovery_threshold: 1,
    };

    #[must_use]
    pub const fn with_checkin_margin(mut self, minutes: u32) -> Self {
        self.checkin_margin = minutes;
        self
    }

    #[must_use]
    pub const fn with_max_runtime(mut self, minutes: u32) -> Self {
        self.max_runtime = minutes;
        self
    }

    #[must_use]
    pub const fn with_failure_issue_threshold(mut self, runs: u32) -> Self {
        self.failure_issue_threshold = runs;
        self
    }

    #[must_use]
    pub const fn with_recovery_threshold(mut self, runs: u32) -> Self {
        self.recovery_threshold = runs;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Returns the monitor configuration declared by the job's type, or the
/// defaults when it declares none.
#[must_use]
pub fn resolve_monitor_config(job: &dyn MonitoredJob) -> MonitorConfig {
    job.monitor_config().unwrap_or_default()
}
