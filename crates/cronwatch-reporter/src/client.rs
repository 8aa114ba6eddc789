//! Live check-in reporter backed by the Sentry envelope endpoint.

use std::time::Duration;

use chrono::Utc;
use cronwatch_core::{AppConfig, CheckInId, MonitorConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use uuid::Uuid;

use crate::dsn::Dsn;
use crate::envelope::{self, CheckInPayload, CheckInStatus, MonitorConfigPayload};
use crate::error::ReporterError;
use crate::reporter::CheckInReporter;

const ENVELOPE_CONTENT_TYPE: &str = "application/x-sentry-envelope";

/// Sends cron check-ins to Sentry.
///
/// Without a DSN the reporter is inert: `open` returns `None` and nothing is
/// sent, which the engine treats as "do not track".
pub struct SentryReporter {
    client: Client,
    dsn: Option<Dsn>,
    environment: Option<String>,
}

impl SentryReporter {
    /// Creates a reporter for `dsn`, or an inert one when `dsn` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError::InvalidDsn`] if the DSN cannot be parsed, or
    /// [`ReporterError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        dsn: Option<&str>,
        environment: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ReporterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(concat!("cronwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let dsn = dsn.map(str::parse::<Dsn>).transpose()?;

        Ok(Self {
            client,
            dsn,
            environment: environment.map(str::to_owned),
        })
    }

    /// Creates a reporter from process configuration.
    ///
    /// # Errors
    ///
    /// See [`SentryReporter::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ReporterError> {
        Self::new(
            config.dsn.as_deref(),
            config.environment.as_deref(),
            config.request_timeout_secs,
        )
    }

    /// Whether check-ins are actually sent.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.dsn.is_some()
    }

    /// Posts one check-in envelope and asserts a 2xx response.
    async fn send(&self, dsn: &Dsn, payload: &CheckInPayload<'_>) -> Result<(), ReporterError> {
        let body = envelope::encode(payload, Utc::now())?;
        let url = dsn.envelope_url();

        let response = self
            .client
            .post(url.clone())
            .header("X-Sentry-Auth", dsn.auth_header())
            .header(CONTENT_TYPE, ENVELOPE_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReporterError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tracing::debug!(
            check_in_id = payload.check_in_id,
            monitor_slug = payload.monitor_slug,
            status = ?payload.status,
            "sentry: check-in sent"
        );
        Ok(())
    }

    async fn close(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
        status: CheckInStatus,
    ) -> Result<(), ReporterError> {
        let Some(dsn) = &self.dsn else {
            return Ok(());
        };
        let payload = CheckInPayload {
            check_in_id: check_in.as_str(),
            monitor_slug,
            status,
            environment: self.environment.as_deref(),
            monitor_config: None,
        };
        self.send(dsn, &payload).await
    }
}

impl CheckInReporter for SentryReporter {
    async fn open(
        &self,
        monitor_slug: &str,
        cron_expression: &str,
        config: &MonitorConfig,
    ) -> Result<Option<CheckInId>, ReporterError> {
        let Some(dsn) = &self.dsn else {
            tracing::debug!(monitor_slug, "sentry: no DSN configured; check-in skipped");
            return Ok(None);
        };

        let check_in_id = Uuid::new_v4().simple().to_string();
        let payload = CheckInPayload {
            check_in_id: &check_in_id,
            monitor_slug,
            status: CheckInStatus::InProgress,
            environment: self.environment.as_deref(),
            monitor_config: Some(MonitorConfigPayload::crontab(cron_expression, config)),
        };
        self.send(dsn, &payload).await?;

        Ok(Some(CheckInId::new(check_in_id)))
    }

    async fn close_success(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> Result<(), ReporterError> {
        self.close(monitor_slug, check_in, CheckInStatus::Ok).await
    }

    async fn close_failure(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> Result<(), ReporterError> {
        self.close(monitor_slug, check_in, CheckInStatus::Error).await
    }
}
