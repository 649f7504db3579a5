// Config loading and validation tests

mod common;

use common::TEST_CONFIG;
use pulsewatch::config::AppConfig;
use pulsewatch::models::{AlertMetric, Protocol, Severity};

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(TEST_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.monitoring.sample_interval_ms, 5000);
    assert_eq!(config.store.max_samples, 100);
    assert_eq!(config.publishing.broadcast_capacity, 10);
}

#[test]
fn test_config_defaults_when_omitted() {
    let minimal = r#"
[server]
port = 3001
host = "0.0.0.0"

[monitoring]
stats_log_interval_secs = 60

[publishing]
broadcast_capacity = 10
"#;
    let config = AppConfig::load_from_str(minimal).expect("valid");
    assert_eq!(config.monitoring.sample_interval_ms, 5000);
    assert_eq!(config.monitoring.default_window_ms, 3_600_000);
    assert_eq!(config.store.max_samples, 10_000);

    let rules = &config.alerts.rules;
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].metric, AlertMetric::Cpu);
    assert_eq!(rules[0].threshold, 80.0);
    assert_eq!(rules[0].level, Severity::Warning);
    assert_eq!(rules[1].metric, AlertMetric::Memory);
    assert_eq!(rules[1].threshold, 85.0);
    assert_eq!(rules[2].metric, AlertMetric::Disk);
    assert_eq!(rules[2].threshold, 90.0);
    assert_eq!(rules[2].level, Severity::Critical);

    let names: Vec<&str> = config.services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "frontend",
            "backend",
            "postgres",
            "redis",
            "mqtt",
            "grafana",
            "prometheus"
        ]
    );
    let backend = &config.services[1];
    assert_eq!(backend.port, 3001);
    assert_eq!(backend.path, "/api/monitoring/health");
    assert_eq!(config.services[2].protocol, Protocol::Tcp);
}

#[test]
fn test_config_custom_rules_and_services() {
    let custom = format!(
        r#"{}
[[alerts.rules]]
metric = "cpu"
threshold = 50.0
level = "critical"
message = "cpu hot"

[[services]]
name = "api"
host = "10.0.0.5"
port = 8080
protocol = "https"
path = "/healthz"
timeout_ms = 250
"#,
        TEST_CONFIG
    );
    let config = AppConfig::load_from_str(&custom).expect("valid");
    assert_eq!(config.alerts.rules.len(), 1);
    assert_eq!(config.alerts.rules[0].threshold, 50.0);
    assert_eq!(config.alerts.rules[0].message, "cpu hot");
    assert_eq!(config.services.len(), 1);
    let api = &config.services[0];
    assert_eq!(api.protocol, Protocol::Https);
    assert_eq!(api.timeout_ms, 250);
    assert_eq!(api.url(), "https://10.0.0.5:8080/healthz");
}

#[test]
fn test_config_service_defaults() {
    let custom = format!(
        r#"{}
[[services]]
name = "redis"
port = 6379
protocol = "tcp"
"#,
        TEST_CONFIG
    );
    let config = AppConfig::load_from_str(&custom).expect("valid");
    let redis = &config.services[0];
    assert_eq!(redis.host, "localhost");
    assert_eq!(redis.timeout_ms, 5000);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = TEST_CONFIG.replace("port = 3001", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_sample_interval_zero() {
    let bad = TEST_CONFIG.replace("sample_interval_ms = 5000", "sample_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = TEST_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_validation_rejects_max_samples_zero() {
    let bad = TEST_CONFIG.replace("max_samples = 100", "max_samples = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_samples"));
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = TEST_CONFIG.replace("broadcast_capacity = 10", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_duplicate_service_names() {
    let custom = format!(
        r#"{}
[[services]]
name = "redis"
port = 6379
protocol = "tcp"

[[services]]
name = "redis"
port = 6380
protocol = "tcp"
"#,
        TEST_CONFIG
    );
    let err = AppConfig::load_from_str(&custom).unwrap_err();
    assert!(err.to_string().contains("unique"));
}

#[test]
fn test_config_validation_rejects_service_timeout_zero() {
    let custom = format!(
        r#"{}
[[services]]
name = "redis"
port = 6379
protocol = "tcp"
timeout_ms = 0
"#,
        TEST_CONFIG
    );
    let err = AppConfig::load_from_str(&custom).unwrap_err();
    assert!(err.to_string().contains("timeout_ms"));
}

#[test]
fn test_config_rejects_unknown_alert_metric() {
    let custom = format!(
        r#"{}
[[alerts.rules]]
metric = "gpu"
threshold = 50.0
level = "warning"
message = "gpu hot"
"#,
        TEST_CONFIG
    );
    assert!(AppConfig::load_from_str(&custom).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, TEST_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.store.max_samples, 100);
}
