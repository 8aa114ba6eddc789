use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub enabled: bool,
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub jobs_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("enabled", &self.enabled)
            .field("dsn", &self.dsn.as_ref().map(|_| "[redacted]"))
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("jobs_path", &self.jobs_path)
            .finish()
    }
}
