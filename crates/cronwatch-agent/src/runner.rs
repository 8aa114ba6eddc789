//! One dispatch of a configured job, bracketed by lifecycle signals.

use std::time::Duration;

use cronwatch_core::{ExecutionContext, MonitoredJob, Trigger};
use cronwatch_engine::{CorrelationEngine, LifecycleSignal};
use cronwatch_reporter::CheckInReporter;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::command::CommandJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed,
}

/// Runs `job` once for `trigger`.
///
/// The engine lock is held only while a signal is handled, never while the
/// command runs. Reporter errors are logged and do not change the outcome.
pub async fn dispatch<R: CheckInReporter>(
    engine: &Mutex<CorrelationEngine<R>>,
    job: &mut CommandJob,
    trigger: &Trigger,
) -> RunOutcome {
    let max_jitter = trigger.max_jitter();
    if !max_jitter.is_zero() {
        tokio::time::sleep(jitter_delay(max_jitter)).await;
    }

    let context = ExecutionContext::new(Uuid::new_v4().to_string(), trigger.clone());
    tracing::info!(
        execution_id = %context.id,
        job = job.name(),
        "agent: job starting"
    );

    emit(engine, LifecycleSignal::PreRun, &context, job).await;

    let outcome = match job.run().await {
        Ok(status) if status.success() => RunOutcome::Succeeded,
        Ok(status) => {
            tracing::warn!(
                execution_id = %context.id,
                job = job.name(),
                exit_code = ?status.code(),
                "agent: job exited unsuccessfully"
            );
            RunOutcome::Failed
        }
        Err(e) => {
            tracing::error!(
                execution_id = %context.id,
                job = job.name(),
                error = %e,
                "agent: job could not be started"
            );
            RunOutcome::Failed
        }
    };

    let signal = match outcome {
        RunOutcome::Succeeded => LifecycleSignal::PostRun,
        RunOutcome::Failed => LifecycleSignal::Failure,
    };
    emit(engine, signal, &context, job).await;

    tracing::info!(
        execution_id = %context.id,
        job = job.name(),
        outcome = ?outcome,
        "agent: job finished"
    );
    outcome
}

async fn emit<R: CheckInReporter>(
    engine: &Mutex<CorrelationEngine<R>>,
    signal: LifecycleSignal,
    context: &ExecutionContext,
    job: &mut dyn MonitoredJob,
) {
    let mut engine = engine.lock().await;
    if let Err(e) = engine.handle(signal, context, job).await {
        tracing::warn!(
            execution_id = %context.id,
            signal = %signal,
            error = %e,
            "agent: check-in reporting failed"
        );
    }
}

fn jitter_delay(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::random_range(0..=max_ms))
}
