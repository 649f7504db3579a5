// Alert rules, the snapshot they are evaluated against, and triggered alerts.

use serde::{Deserialize, Serialize};

use super::{AlertMetric, Sample};

/// Alert severity; serializes to lowercase JSON (e.g. "warning").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Static threshold rule: fires when `metric` is strictly greater than `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub metric: AlertMetric,
    pub threshold: f64,
    pub level: Severity,
    pub message: String,
}

impl AlertRule {
    pub fn new(metric: AlertMetric, threshold: f64, level: Severity, message: &str) -> Self {
        Self {
            metric,
            threshold,
            level,
            message: message.to_string(),
        }
    }
}

/// cpu > 80 warning, memory > 85 warning, disk > 90 critical.
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            AlertMetric::Cpu,
            80.0,
            Severity::Warning,
            "High CPU usage detected",
        ),
        AlertRule::new(
            AlertMetric::Memory,
            85.0,
            Severity::Warning,
            "High memory usage detected",
        ),
        AlertRule::new(
            AlertMetric::Disk,
            90.0,
            Severity::Critical,
            "Disk space critically low",
        ),
    ]
}

/// The values rules are checked against. All fields are required on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl AlertSnapshot {
    pub fn get(&self, metric: AlertMetric) -> f64 {
        match metric {
            AlertMetric::Cpu => self.cpu,
            AlertMetric::Memory => self.memory,
            AlertMetric::Disk => self.disk,
        }
    }
}

impl From<&Sample> for AlertSnapshot {
    fn from(s: &Sample) -> Self {
        AlertSnapshot {
            cpu: s.cpu,
            memory: s.memory,
            disk: s.disk,
        }
    }
}

/// A rule that fired, with the observed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub metric: AlertMetric,
    pub threshold: f64,
    pub level: Severity,
    pub message: String,
    pub value: f64,
}
