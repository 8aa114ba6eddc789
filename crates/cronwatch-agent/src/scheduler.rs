//! Registers configured jobs with the cron scheduler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use cronwatch_core::{JobSpec, Trigger};
use cronwatch_engine::CorrelationEngine;
use cronwatch_reporter::CheckInReporter;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::command::CommandJob;
use crate::runner;

/// Builds and starts the scheduler with one entry per configured job.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler<R>(
    jobs: &[JobSpec],
    engine: Arc<Mutex<CorrelationEngine<R>>>,
) -> Result<JobScheduler, JobSchedulerError>
where
    R: CheckInReporter + 'static,
{
    let scheduler = JobScheduler::new().await?;

    for spec in jobs {
        register_job(&scheduler, spec, Arc::clone(&engine)).await?;
    }

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_job<R>(
    scheduler: &JobScheduler,
    spec: &JobSpec,
    engine: Arc<Mutex<CorrelationEngine<R>>>,
) -> Result<(), JobSchedulerError>
where
    R: CheckInReporter + 'static,
{
    let trigger = spec.trigger();
    let template = CommandJob::from_spec(spec);
    let shared_trigger = Arc::new(trigger.clone());

    let run = move |_uuid: Uuid, _lock: JobScheduler| {
        let engine = Arc::clone(&engine);
        let trigger = Arc::clone(&shared_trigger);
        let mut job = template.clone();

        Box::pin(async move {
            runner::dispatch(&engine, &mut job, &trigger).await;
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    };

    let job = match trigger.underlying() {
        Trigger::Cron(expression) => Job::new_async(scheduler_cron(expression).as_str(), run)?,
        Trigger::Periodic { every } => Job::new_repeated_async(*every, run)?,
        Trigger::Jitter { .. } => return Err(JobSchedulerError::ParseSchedule),
    };

    scheduler.add(job).await?;
    tracing::info!(
        job = %spec.name,
        trigger = %trigger,
        "scheduler: registered job"
    );
    Ok(())
}

/// The scheduler's cron syntax has a leading seconds field.
fn scheduler_cron(expression: &str) -> String {
    format!("0 {expression}")
}
