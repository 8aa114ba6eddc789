//! The correlation engine.
//!
//! Owns the table that maps a live execution to its open check-in. Every
//! handler takes `&mut self`: one engine serves one stream of signals, and a
//! host with several workers gives each worker its own engine.

use std::collections::HashMap;

use cronwatch_core::{
    resolve_monitor_config, AppConfig, CheckInId, ExecutionContext, MonitoredJob,
};
use cronwatch_reporter::{CheckInReporter, ReporterError, SentryReporter};

use crate::signal::LifecycleSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

/// Opens a check-in when a cron-triggered job starts and closes it when the
/// job finishes or fails.
///
/// Reporter failures are returned to the caller unchanged and never retried.
/// A run whose closing signal never arrives stays in the table for the life
/// of the engine; [`CorrelationEngine::pending_count`] exposes its size.
pub struct CorrelationEngine<R = SentryReporter> {
    enabled: bool,
    reporter: R,
    check_ins: HashMap<String, CheckInId>,
}

impl CorrelationEngine<SentryReporter> {
    /// Builds an engine that reports to Sentry using process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError`] if the live reporter cannot be constructed.
    pub fn live(config: &AppConfig) -> Result<Self, ReporterError> {
        Ok(Self::new(config.enabled, SentryReporter::from_config(config)?))
    }
}

impl<R: CheckInReporter> CorrelationEngine<R> {
    #[must_use]
    pub fn new(enabled: bool, reporter: R) -> Self {
        Self {
            enabled,
            reporter,
            check_ins: HashMap::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Number of executions with an open check-in tracked in the table.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.check_ins.len()
    }

    #[must_use]
    pub fn is_tracking(&self, execution_id: &str) -> bool {
        self.check_ins.contains_key(execution_id)
    }

    /// Routes a lifecycle signal to its handler.
    ///
    /// # Errors
    ///
    /// Propagates any [`ReporterError`] from the handler.
    pub async fn handle(
        &mut self,
        signal: LifecycleSignal,
        context: &ExecutionContext,
        job: &mut dyn MonitoredJob,
    ) -> Result<(), ReporterError> {
        match signal {
            LifecycleSignal::PreRun => self.on_pre_run(context, job).await,
            LifecycleSignal::PostRun => self.on_post_run(context, job).await,
            LifecycleSignal::Failure => self.on_failure(context, job).await,
        }
    }

    /// Opens a check-in for a cron-triggered run.
    ///
    /// Runs whose underlying trigger is not a cron rule are ignored. Every
    /// other run opens a fresh check-in. A plain job's check-in is stored
    /// under the execution id; an async-chained job carries it itself,
    /// replacing any token left over from an earlier dispatch.
    ///
    /// # Errors
    ///
    /// Propagates any [`ReporterError`] from opening the check-in.
    pub async fn on_pre_run(
        &mut self,
        context: &ExecutionContext,
        job: &mut dyn MonitoredJob,
    ) -> Result<(), ReporterError> {
        if !self.enabled {
            return Ok(());
        }

        let Some(cron_expression) = context.trigger.cron_expression() else {
            tracing::debug!(
                execution_id = %context.id,
                trigger = %context.trigger,
                "check-in: trigger has no crontab form; not monitored"
            );
            return Ok(());
        };

        let monitor_slug = job.monitor_slug();
        let config = resolve_monitor_config(&*job);
        let Some(check_in) = self
            .reporter
            .open(&monitor_slug, cron_expression, &config)
            .await?
        else {
            tracing::debug!(
                execution_id = %context.id,
                monitor_slug = %monitor_slug,
                "check-in: reporter returned no id; not tracking"
            );
            return Ok(());
        };

        tracing::info!(
            execution_id = %context.id,
            monitor_slug = %monitor_slug,
            check_in_id = %check_in,
            "check-in: opened"
        );

        match job.async_completion() {
            Some(chain) => {
                if let Some(stale) = chain.check_in() {
                    tracing::warn!(
                        execution_id = %context.id,
                        monitor_slug = %monitor_slug,
                        check_in_id = %stale,
                        "check-in: replacing a chained check-in that was never closed"
                    );
                }
                chain.set_check_in(Some(check_in));
            }
            None => {
                self.check_ins.insert(context.id.clone(), check_in);
            }
        }
        Ok(())
    }

    /// Closes the run's check-in as succeeded.
    ///
    /// An async-chained job is only closed once it reports its final run;
    /// earlier links leave the check-in open.
    ///
    /// # Errors
    ///
    /// Propagates any [`ReporterError`] from closing the check-in. The
    /// check-in stays tracked when closing fails.
    pub async fn on_post_run(
        &mut self,
        context: &ExecutionContext,
        job: &mut dyn MonitoredJob,
    ) -> Result<(), ReporterError> {
        if !self.enabled {
            return Ok(());
        }
        self.close(context, job, Outcome::Success).await
    }

    /// Closes the run's check-in as failed.
    ///
    /// Unlike [`CorrelationEngine::on_post_run`], an async-chained job is
    /// closed whichever link failed.
    ///
    /// # Errors
    ///
    /// Propagates any [`ReporterError`] from closing the check-in. The
    /// check-in stays tracked when closing fails.
    pub async fn on_failure(
        &mut self,
        context: &ExecutionContext,
        job: &mut dyn MonitoredJob,
    ) -> Result<(), ReporterError> {
        if !self.enabled {
            return Ok(());
        }
        self.close(context, job, Outcome::Failure).await
    }

    async fn close(
        &mut self,
        context: &ExecutionContext,
        job: &mut dyn MonitoredJob,
        outcome: Outcome,
    ) -> Result<(), ReporterError> {
        let check_in = match job.async_completion() {
            Some(chain) => {
                if outcome == Outcome::Success && !chain.is_final_run() {
                    tracing::debug!(
                        execution_id = %context.id,
                        "check-in: chained run is not final; leaving check-in open"
                    );
                    return Ok(());
                }
                chain.check_in()
            }
            None => self.check_ins.get(&context.id).cloned(),
        };

        let Some(check_in) = check_in else {
            return Ok(());
        };

        let monitor_slug = job.monitor_slug();
        match outcome {
            Outcome::Success => {
                self.reporter.close_success(&monitor_slug, &check_in).await?;
            }
            Outcome::Failure => {
                self.reporter.close_failure(&monitor_slug, &check_in).await?;
            }
        }

        tracing::info!(
            execution_id = %context.id,
            monitor_slug = %monitor_slug,
            check_in_id = %check_in,
            outcome = ?outcome,
            "check-in: closed"
        );

        self.check_ins.remove(&context.id);
        if let Some(chain) = job.async_completion() {
            chain.set_check_in(None);
        }
        Ok(())
    }
}
