use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::monitor::MonitorConfig;
use crate::trigger::Trigger;
use crate::ConfigError;

/// When a configured job runs. Exactly one of `cron` or `every_secs` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSpec {
    /// Five-field cron expression.
    pub cron: Option<String>,
    pub every_secs: Option<u64>,
    /// Upper bound of a random delay added before each run.
    pub jitter_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub name: String,
    /// Program followed by its arguments. Not run through a shell.
    pub command: Vec<String>,
    pub schedule: ScheduleSpec,
    pub monitor: Option<MonitorConfig>,
}

impl JobSpec {
    /// The trigger this job's schedule describes.
    ///
    /// Only meaningful on a validated spec; an interval of zero is returned
    /// for a spec with neither `cron` nor `every_secs`.
    #[must_use]
    pub fn trigger(&self) -> Trigger {
        let base = match (&self.schedule.cron, self.schedule.every_secs) {
            (Some(cron), _) => Trigger::cron(cron.trim()),
            (None, every) => Trigger::every(Duration::from_secs(every.unwrap_or_default())),
        };
        match self.schedule.jitter_secs {
            Some(secs) if secs > 0 => base.with_jitter(Duration::from_secs(secs)),
            _ => base,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JobsFile {
    pub jobs: Vec<JobSpec>,
}

/// Load and validate the jobs file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_jobs(path: &Path) -> Result<JobsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::JobsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_jobs(&content)
}

/// Parse and validate jobs-file YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_jobs(content: &str) -> Result<JobsFile, ConfigError> {
    let jobs_file: JobsFile = serde_yaml::from_str(content).map_err(ConfigError::JobsFileParse)?;
    validate_jobs(&jobs_file)?;
    Ok(jobs_file)
}

fn validate_jobs(jobs_file: &JobsFile) -> Result<(), ConfigError> {
    if jobs_file.jobs.is_empty() {
        return Err(invalid("<file>", "no jobs defined"));
    }

    let mut seen_names = HashSet::new();
    for job in &jobs_file.jobs {
        let name = job.name.as_str();

        if name.is_empty() {
            return Err(invalid(name, "name must be non-empty"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(invalid(
                name,
                "name may only contain lowercase letters, digits, and underscores",
            ));
        }
        if !seen_names.insert(name) {
            return Err(invalid(name, "duplicate job name"));
        }
        if job.command.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(invalid(name, "command must name a program"));
        }

        validate_schedule(name, &job.schedule)?;
    }

    Ok(())
}

fn validate_schedule(name: &str, schedule: &ScheduleSpec) -> Result<(), ConfigError> {
    match (&schedule.cron, schedule.every_secs) {
        (Some(_), Some(_)) => Err(invalid(name, "schedule sets both cron and every_secs")),
        (None, None) => Err(invalid(name, "schedule needs cron or every_secs")),
        (None, Some(0)) => Err(invalid(name, "every_secs must be greater than zero")),
        (None, Some(_)) => Ok(()),
        (Some(cron), None) => {
            let fields = cron.split_whitespace().count();
            if fields == 5 {
                Ok(())
            } else {
                Err(invalid(
                    name,
                    &format!("cron expression \"{cron}\" has {fields} fields; expected 5"),
                ))
            }
        }
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidJob {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "jobs_test.rs"]
mod tests;
