//! Sentry DSN parsing.
//!
//! A DSN has the form `{scheme}://{public_key}@{host}[:port][/prefix]/{project_id}`
//! and determines both where envelopes are posted and how they authenticate.

use std::str::FromStr;

use reqwest::Url;

use crate::error::ReporterError;

const SENTRY_PROTOCOL_VERSION: u8 = 7;
const CLIENT_NAME: &str = concat!("cronwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Dsn {
    public_key: String,
    project_id: String,
    envelope_url: Url,
}

impl Dsn {
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Endpoint envelopes are posted to.
    #[must_use]
    pub fn envelope_url(&self) -> &Url {
        &self.envelope_url
    }

    /// Value of the `X-Sentry-Auth` header.
    #[must_use]
    pub fn auth_header(&self) -> String {
        format!(
            "Sentry sentry_version={SENTRY_PROTOCOL_VERSION}, sentry_client={CLIENT_NAME}, sentry_key={}",
            self.public_key
        )
    }
}

impl std::fmt::Debug for Dsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dsn")
            .field("public_key", &"[redacted]")
            .field("project_id", &self.project_id)
            .field("envelope_url", &self.envelope_url.as_str())
            .finish()
    }
}

impl FromStr for Dsn {
    type Err = ReporterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(raw.trim()).map_err(|e| ReporterError::InvalidDsn(e.to_string()))?;

        let scheme = url.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(ReporterError::InvalidDsn(format!(
                "unsupported scheme \"{scheme}\""
            )));
        }

        let public_key = url.username();
        if public_key.is_empty() {
            return Err(ReporterError::InvalidDsn("missing public key".to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| ReporterError::InvalidDsn("missing host".to_string()))?;

        let mut segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let project_id = segments
            .pop()
            .ok_or_else(|| ReporterError::InvalidDsn("missing project id".to_string()))?;

        let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
        let prefix = if segments.is_empty() {
            String::new()
        } else {
            format!("/{}", segments.join("/"))
        };
        let envelope = format!("{scheme}://{host}{port}{prefix}/api/{project_id}/envelope/");
        let envelope_url =
            Url::parse(&envelope).map_err(|e| ReporterError::InvalidDsn(e.to_string()))?;

        Ok(Self {
            public_key: public_key.to_string(),
            project_id: project_id.to_string(),
            envelope_url,
        })
    }
}
