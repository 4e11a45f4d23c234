//! Tests for configuration validation

use std::collections::HashMap;

use bounded_scheduler::config::{SchedulerConfig, CONCURRENCY_ENV, DEFAULT_CONCURRENCY};
use bounded_scheduler::core::SchedulerError;
use parking_lot::Mutex;

/// Serialises tests that touch the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `CONCURRENCY_ENV` set to `value`, restoring it afterwards.
fn with_concurrency_env<R>(value: &str, f: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK.lock();
    let previous = std::env::var(CONCURRENCY_ENV).ok();
    std::env::set_var(CONCURRENCY_ENV, value);
    let result = f();
    match previous {
        Some(previous) => std::env::set_var(CONCURRENCY_ENV, previous),
        None => std::env::remove_var(CONCURRENCY_ENV),
    }
    result
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_default_concurrency() {
    let config = SchedulerConfig::default();
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_concurrency_is_invalid() {
    let config = SchedulerConfig::with_concurrency(0);
    assert!(matches!(config.validate(), Err(SchedulerError::InvalidLimit(0))));
}

#[test]
fn test_config_from_json() {
    let config = SchedulerConfig::from_json_str(r#"{ "concurrency": 8 }"#).unwrap();
    assert_eq!(config.concurrency, 8);
}

#[test]
fn test_config_from_json_uses_default() {
    let config = SchedulerConfig::from_json_str("{}").unwrap();
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
}

#[test]
fn test_config_from_json_rejects_zero() {
    let result = SchedulerConfig::from_json_str(r#"{ "concurrency": 0 }"#);
    assert!(matches!(result, Err(SchedulerError::InvalidLimit(0))));
}

#[test]
fn test_config_from_json_rejects_negative() {
    let result = SchedulerConfig::from_json_str(r#"{ "concurrency": -3 }"#);
    assert!(matches!(result, Err(SchedulerError::Configuration(_))));
}

#[test]
fn test_config_from_lookup() {
    let config = SchedulerConfig::from_lookup(lookup(&[(CONCURRENCY_ENV, " 12 ")])).unwrap();
    assert_eq!(config.concurrency, 12);
}

#[test]
fn test_config_from_lookup_unset() {
    let config = SchedulerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, SchedulerConfig::default());
}

#[test]
fn test_config_from_lookup_garbage() {
    let result = SchedulerConfig::from_lookup(lookup(&[(CONCURRENCY_ENV, "lots")]));
    match result {
        Err(SchedulerError::Configuration(msg)) => assert!(msg.contains(CONCURRENCY_ENV)),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_config_from_env() {
    let config = with_concurrency_env("7", SchedulerConfig::from_env).unwrap();
    assert_eq!(config.concurrency, 7);
}

#[test]
fn test_config_from_env_garbage() {
    let result = with_concurrency_env("zero", SchedulerConfig::from_env);
    assert!(matches!(result, Err(SchedulerError::Configuration(_))));

    let result = with_concurrency_env("0", SchedulerConfig::from_env);
    assert!(matches!(result, Err(SchedulerError::InvalidLimit(0))));
}
