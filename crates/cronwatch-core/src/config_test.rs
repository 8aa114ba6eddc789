use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.enabled);
    assert!(cfg.dsn.is_none());
    assert!(cfg.environment.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.jobs_path.to_str(), Some("./config/jobs.yaml"));
}

#[test]
fn build_app_config_reads_dsn_and_environment() {
    let mut map = HashMap::new();
    map.insert("SENTRY_DSN", "https://public@o1.ingest.sentry.io/42");
    map.insert("CRONWATCH_ENVIRONMENT", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.dsn.as_deref(),
        Some("https://public@o1.ingest.sentry.io/42")
    );
    assert_eq!(cfg.environment.as_deref(), Some("production"));
}

#[test]
fn build_app_config_treats_blank_dsn_as_unset() {
    let mut map = HashMap::new();
    map.insert("SENTRY_DSN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.dsn.is_none());
}

#[test]
fn build_app_config_disabled_flag() {
    for raw in ["false", "0", "no", "OFF"] {
        let mut map = HashMap::new();
        map.insert("CRONWATCH_ENABLED", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.enabled, "{raw} should disable");
    }
}

#[test]
fn build_app_config_invalid_enabled_flag() {
    let mut map = HashMap::new();
    map.insert("CRONWATCH_ENABLED", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CRONWATCH_ENABLED"),
        "expected InvalidEnvVar(CRONWATCH_ENABLED), got: {result:?}"
    );
}

#[test]
fn build_app_config_request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("CRONWATCH_REQUEST_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 3);
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("CRONWATCH_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CRONWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CRONWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_request_timeout() {
    let mut map = HashMap::new();
    map.insert("CRONWATCH_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CRONWATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CRONWATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_redacts_dsn() {
    let mut map = HashMap::new();
    map.insert("SENTRY_DSN", "https://secret-key@o1.ingest.sentry.io/42");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-key"), "dsn leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
