use serde::Deserialize;
use std::collections::HashSet;

use crate::models::{AlertRule, ServiceSpec, default_rules, default_services};
use crate::store::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// How often to log app stats (ws clients, samples stored) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Window used by summary/trend queries that do not pass one.
    #[serde(default = "default_window_ms")]
    pub default_window_ms: u64,
}

fn default_sample_interval_ms() -> u64 {
    5000
}

fn default_window_ms() -> u64 {
    60 * 60 * 1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
}

fn default_max_samples() -> usize {
    DEFAULT_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of events kept in the broadcast channel for /ws/metrics (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<AlertRule>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.default_window_ms > 0,
            "monitoring.default_window_ms must be > 0, got {}",
            self.monitoring.default_window_ms
        );
        anyhow::ensure!(
            self.store.max_samples > 0,
            "store.max_samples must be > 0, got {}",
            self.store.max_samples
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        for rule in &self.alerts.rules {
            anyhow::ensure!(
                rule.threshold.is_finite(),
                "alerts.rules threshold for {} must be finite, got {}",
                rule.metric,
                rule.threshold
            );
        }
        let mut names = HashSet::new();
        for service in &self.services {
            anyhow::ensure!(!service.name.is_empty(), "services.name must be non-empty");
            anyhow::ensure!(
                !service.host.is_empty(),
                "services.host must be non-empty for {}",
                service.name
            );
            anyhow::ensure!(
                service.port > 0,
                "services.port must be > 0 for {}",
                service.name
            );
            anyhow::ensure!(
                service.timeout_ms > 0,
                "services.timeout_ms must be > 0 for {}",
                service.name
            );
            anyhow::ensure!(
                names.insert(service.name.as_str()),
                "services.name must be unique, {} appears twice",
                service.name
            );
        }
        Ok(())
    }
}
