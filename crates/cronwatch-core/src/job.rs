//! Capabilities a scheduled job exposes to the check-in engine.

use crate::execution::CheckInId;
use crate::monitor::MonitorConfig;
use crate::slug::monitor_slug;

/// A job the scheduler can dispatch and the engine can monitor.
///
/// Every method has a default, so a plain job only needs an empty impl:
///
/// ```
/// use cronwatch_core::MonitoredJob;
///
/// struct SendWeeklyDigest;
/// impl MonitoredJob for SendWeeklyDigest {}
///
/// assert_eq!(SendWeeklyDigest.monitor_slug(), "send_weekly_digest");
/// ```
pub trait MonitoredJob: Send {
    /// Name of the job type. Defaults to the Rust type path.
    fn job_type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Stable monitor identity on the backend, derived from the type name.
    fn monitor_slug(&self) -> String {
        monitor_slug(self.job_type_name())
    }

    /// Monitor parameters declared by this job type, if any.
    fn monitor_config(&self) -> Option<MonitorConfig> {
        None
    }

    /// Async completion state, for jobs whose real completion arrives after
    /// several linked runs. Plain jobs return `None`.
    fn async_completion(&mut self) -> Option<&mut dyn AsyncCompletion> {
        None
    }
}

/// Lets a job declare which of its linked runs is the final one, and carry
/// the open check-in between runs.
pub trait AsyncCompletion: Send {
    /// Whether the current run is the last link of the chain.
    fn is_final_run(&self) -> bool;

    /// Marks the current run as the last link of the chain.
    fn mark_final_run(&mut self);

    fn check_in(&self) -> Option<CheckInId>;

    /// Stores the check-in opened for this chain, or clears it once closed.
    fn set_check_in(&mut self, check_in: Option<CheckInId>);
}

/// Ready-made [`AsyncCompletion`] state for a job to embed.
///
/// Storing or clearing the carried check-in also clears the final-run flag,
/// so a job object reused across dispatches starts each chain unmarked.
///
/// ```
/// use cronwatch_core::{AsyncCompletion, ChainedRun, MonitoredJob};
///
/// #[derive(Default)]
/// struct RebuildSearchIndex {
///     chain: ChainedRun,
/// }
///
/// impl MonitoredJob for RebuildSearchIndex {
///     fn async_completion(&mut self) -> Option<&mut dyn AsyncCompletion> {
///         Some(&mut self.chain)
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainedRun {
    final_run: bool,
    check_in: Option<CheckInId>,
}

impl AsyncCompletion for ChainedRun {
    fn is_final_run(&self) -> bool {
        self.final_run
    }

    fn mark_final_run(&mut self) {
        self.final_run = true;
    }

    fn check_in(&self) -> Option<CheckInId> {
        self.check_in.clone()
    }

    fn set_check_in(&mut self, check_in: Option<CheckInId>) {
        self.check_in = check_in;
        self.final_run = false;
    }
}
