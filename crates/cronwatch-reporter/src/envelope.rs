//! Envelope encoding for Sentry cron check-ins.
//!
//! An envelope is newline-delimited JSON: an envelope header, an item header,
//! and the check-in payload.

use chrono::{DateTime, SecondsFormat, Utc};
use cronwatch_core::MonitorConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    InProgress,
    Ok,
    Error,
}

#[derive(Serialize)]
struct EnvelopeHeader {
    sent_at: String,
}

#[derive(Serialize)]
struct ItemHeader {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct Schedule<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonitorConfigPayload<'a> {
    schedule: Schedule<'a>,
    checkin_margin: u32,
    max_runtime: u32,
    failure_issue_threshold: u32,
    recovery_threshold: u32,
}

impl<'a> MonitorConfigPayload<'a> {
    pub(crate) fn crontab(cron_expression: &'a str, config: &MonitorConfig) -> Self {
        Self {
            schedule: Schedule {
                kind: "crontab",
                value: cron_expression,
            },
            checkin_margin: config.checkin_margin,
            max_runtime: config.max_runtime,
            failure_issue_threshold: config.failure_issue_threshold,
            recovery_threshold: config.recovery_threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckInPayload<'a> {
    pub check_in_id: &'a str,
    pub monitor_slug: &'a str,
    pub status: CheckInStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_config: Option<MonitorConfigPayload<'a>>,
}

/// Serialize a check-in into an envelope body.
pub(crate) fn encode(
    payload: &CheckInPayload<'_>,
    sent_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    let header = EnvelopeHeader {
        sent_at: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let item = ItemHeader { kind: "check_in" };

    Ok(format!(
        "{}\n{}\n{}\n",
        serde_json::to_string(&header)?,
        serde_json::to_string(&item)?,
        serde_json::to_string(payload)?
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::Value;

    use super::*;

    fn sent_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap()
    }

    fn lines(body: &str) -> Vec<Value> {
        body.lines()
            .map(|l| serde_json::from_str(l).expect("each line is JSON"))
            .collect()
    }

    #[test]
    fn opening_check_in_carries_monitor_config() {
        let config = MonitorConfig::default().with_checkin_margin(5);
        let payload = CheckInPayload {
            check_in_id: "a1b2",
            monitor_slug: "send_weekly_digest",
            status: CheckInStatus::InProgress,
            environment: Some("production"),
            monitor_config: Some(MonitorConfigPayload::crontab("0 9 * * 1", &config)),
        };

        let body = encode(&payload, sent_at()).unwrap();
        let parts = lines(&body);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["sent_at"], "2026-10-12T09:00:00.000Z");
        assert_eq!(parts[1]["type"], "check_in");

        let check_in = &parts[2];
        assert_eq!(check_in["check_in_id"], "a1b2");
        assert_eq!(check_in["monitor_slug"], "send_weekly_digest");
        assert_eq!(check_in["status"], "in_progress");
        assert_eq!(check_in["environment"], "production");
        assert_eq!(check_in["monitor_config"]["schedule"]["type"], "crontab");
        assert_eq!(check_in["monitor_config"]["schedule"]["value"], "0 9 * * 1");
        assert_eq!(check_in["monitor_config"]["checkin_margin"], 5);
        assert_eq!(check_in["monitor_config"]["max_runtime"], 30);
        assert_eq!(check_in["monitor_config"]["failure_issue_threshold"], 1);
        assert_eq!(check_in["monitor_config"]["recovery_threshold"], 1);
    }

    #[test]
    fn closing_check_in_omits_optional_fields() {
        let payload = CheckInPayload {
            check_in_id: "a1b2",
            monitor_slug: "send_weekly_digest",
            status: CheckInStatus::Error,
            environment: None,
            monitor_config: None,
        };

        let body = encode(&payload, sent_at()).unwrap();
        let check_in = &lines(&body)[2];
        assert_eq!(check_in["status"], "error");
        assert!(check_in.get("environment").is_none());
        assert!(check_in.get("monitor_config").is_none());
    }
}
