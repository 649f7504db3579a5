// Metric names used by trend queries and alert rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MetricsError;

/// Any numeric field of a [`super::Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
    NetworkUpload,
    NetworkDownload,
    Temperature,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::Disk,
        Metric::NetworkUpload,
        Metric::NetworkDownload,
        Metric::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Disk => "disk",
            Metric::NetworkUpload => "networkUpload",
            Metric::NetworkDownload => "networkDownload",
            Metric::Temperature => "temperature",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = MetricsError;

    /// Accepts camelCase and snake_case spellings (e.g. "networkUpload", "network_upload").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Metric::Cpu),
            "memory" => Ok(Metric::Memory),
            "disk" => Ok(Metric::Disk),
            "networkupload" | "network_upload" => Ok(Metric::NetworkUpload),
            "networkdownload" | "network_download" => Ok(Metric::NetworkDownload),
            "temperature" => Ok(Metric::Temperature),
            _ => Err(MetricsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Metrics an alert rule can watch; serializes lowercase ("cpu").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMetric {
    Cpu,
    Memory,
    Disk,
}

impl fmt::Display for AlertMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertMetric::Cpu => "cpu",
            AlertMetric::Memory => "memory",
            AlertMetric::Disk => "disk",
        };
        f.write_str(s)
    }
}
