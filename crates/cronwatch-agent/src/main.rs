mod command;
mod runner;
mod scheduler;


use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cronwatch_engine::CorrelationEngine;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cronwatch-agent")]
#[command(about = "Runs scheduled commands and reports them as cron check-ins")]
struct Cli {
    /// Jobs file to load. Defaults to `CRONWATCH_JOBS_PATH`.
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Validate the jobs file and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cronwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let jobs_path = cli.jobs.unwrap_or_else(|| config.jobs_path.clone());
    let jobs_file = cronwatch_core::load_jobs(&jobs_path)?;

    if cli.check {
        for job in &jobs_file.jobs {
            println!("{}\t{}", job.name, job.trigger());
        }
        println!("{}: {} job(s) OK", jobs_path.display(), jobs_file.jobs.len());
        return Ok(());
    }

    let engine = CorrelationEngine::live(&config)?;
    if !engine.reporter().is_active() {
        tracing::warn!("agent: SENTRY_DSN is not set; check-ins will not be sent");
    }
    tracing::info!(
        enabled = engine.is_enabled(),
        jobs = jobs_file.jobs.len(),
        path = %jobs_path.display(),
        "agent: starting"
    );

    let mut scheduler =
        scheduler::build_scheduler(&jobs_file.jobs, Arc::new(Mutex::new(engine))).await?;

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
