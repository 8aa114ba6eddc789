use thiserror::Error;

/// Errors returned by a check-in reporter.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured DSN could not be parsed.
    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    /// The check-in payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
