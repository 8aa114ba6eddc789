//! Shared types for cronwatch: monitor configuration, triggers, job
//! capabilities, and process configuration.

pub mod app_config;
pub mod config;
pub mod error;
pub mod execution;
pub mod job;
pub mod jobs;
pub mod monitor;
pub mod slug;
pub mod trigger;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use execution::{CheckInId, ExecutionContext};
pub use job::{AsyncCompletion, ChainedRun, MonitoredJob};
pub use jobs::{load_jobs, parse_jobs, JobSpec, JobsFile, ScheduleSpec};
pub use monitor::{resolve_monitor_config, MonitorConfig};
pub use slug::monitor_slug;
pub use trigger::Trigger;
