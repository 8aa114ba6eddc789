//! External commands run by the agent.

use std::process::{ExitStatus, Stdio};

use cronwatch_core::{JobSpec, MonitorConfig, MonitoredJob};
use tokio::process::Command;

/// A configured job whose work is an external program.
///
/// Its monitor identity comes from the configured name rather than the Rust
/// type, so every entry in the jobs file gets its own monitor.
#[derive(Debug, Clone)]
pub struct CommandJob {
    name: String,
    argv: Vec<String>,
    monitor: Option<MonitorConfig>,
}

impl CommandJob {
    #[must_use]
    pub fn from_spec(spec: &JobSpec) -> Self {
        Self {
            name: spec.name.clone(),
            argv: spec.command.clone(),
            monitor: spec.monitor,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the command to completion with inherited stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the command is empty or cannot be spawned.
    pub async fn run(&self) -> std::io::Result<ExitStatus> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("job {} has an empty command", self.name),
            ));
        };

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
    }
}

impl MonitoredJob for CommandJob {
    fn job_type_name(&self) -> &str {
        &self.name
    }

    fn monitor_config(&self) -> Option<MonitorConfig> {
        self.monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cronwatch_core::ScheduleSpec;

    fn spec(name: &str, command: &[&str]) -> JobSpec {
        JobSpec {
            name: name.to_string(),
            command: command.iter().map(ToString::to_string).collect(),
            schedule: ScheduleSpec {
                cron: Some("* * * * *".to_string()),
                every_secs: None,
                jitter_secs: None,
            },
            monitor: None,
        }
    }

    #[test]
    fn slug_comes_from_configured_name() {
        let job = CommandJob::from_spec(&spec("send_weekly_digest", &["true"]));
        assert_eq!(job.monitor_slug(), "send_weekly_digest");
    }

    #[test]
    fn declared_monitor_config_is_exposed() {
        let mut job_spec = spec("export", &["true"]);
        job_spec.monitor = Some(MonitorConfig::default().with_max_runtime(5));
        let job = CommandJob::from_spec(&job_spec);
        assert_eq!(job.monitor_config().map(|c| c.max_runtime), Some(5));
    }

    #[test]
    fn jobs_without_monitor_section_use_defaults() {
        let job = CommandJob::from_spec(&spec("export", &["true"]));
        assert!(job.monitor_config().is_none());
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let job = CommandJob::from_spec(&spec("broken", &[]));
        let err = job.run().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_is_reported() {
        let ok = CommandJob::from_spec(&spec("ok", &["sh", "-c", "exit 0"]));
        assert!(ok.run().await.unwrap().success());

        let failing = CommandJob::from_spec(&spec("failing", &["sh", "-c", "exit 3"]));
        assert_eq!(failing.run().await.unwrap().code(), Some(3));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let job = CommandJob::from_spec(&spec("missing", &["/nonexistent/cronwatch-test-bin"]));
        assert!(job.run().await.is_err());
    }
}
