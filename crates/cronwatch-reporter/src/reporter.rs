use std::future::Future;

use cronwatch_core::{CheckInId, MonitorConfig};

use crate::error::ReporterError;

/// The monitoring backend, as seen by the correlation engine.
///
/// Each `open` starts a new heartbeat span; calls are not idempotent.
/// Implementations must not retry internally.
pub trait CheckInReporter: Send + Sync {
    /// Open an in-progress check-in for `monitor_slug`.
    ///
    /// Returns `Ok(None)` when reporting is switched off downstream and there
    /// is nothing to track.
    fn open(
        &self,
        monitor_slug: &str,
        cron_expression: &str,
        config: &MonitorConfig,
    ) -> impl Future<Output = Result<Option<CheckInId>, ReporterError>> + Send;

    /// Mark an open check-in as succeeded.
    fn close_success(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> impl Future<Output = Result<(), ReporterError>> + Send;

    /// Mark an open check-in as failed.
    fn close_failure(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> impl Future<Output = Result<(), ReporterError>> + Send;
}
