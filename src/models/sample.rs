// Samples: one observation per collector tick, plus the raw collector snapshot it is built from.

use serde::{Deserialize, Serialize};

use super::Metric;
use crate::error::MetricsError;

/// One timestamped observation of system state. Percent fields are 0-100, network rates bytes/sec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Milliseconds since epoch.
    pub timestamp: u64,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network_upload: f64,
    pub network_download: f64,
    /// Degrees; 0 when no sensor is available.
    #[serde(default)]
    pub temperature: f64,
}

impl Sample {
    /// Rejects non-finite values, percents outside [0, 100] and negative network rates.
    pub fn validate(&self) -> Result<(), MetricsError> {
        let percents = [
            ("cpu", self.cpu),
            ("memory", self.memory),
            ("disk", self.disk),
        ];
        for (field, value) in percents {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(MetricsError::InvalidSample { field, value });
            }
        }
        let rates = [
            ("networkUpload", self.network_upload),
            ("networkDownload", self.network_download),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(MetricsError::InvalidSample { field, value });
            }
        }
        if !self.temperature.is_finite() {
            return Err(MetricsError::InvalidSample {
                field: "temperature",
                value: self.temperature,
            });
        }
        Ok(())
    }

    /// Value of `metric` in this sample.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Memory => self.memory,
            Metric::Disk => self.disk,
            Metric::NetworkUpload => self.network_upload,
            Metric::NetworkDownload => self.network_download,
            Metric::Temperature => self.temperature,
        }
    }
}

impl From<&HostSnapshot> for Sample {
    fn from(s: &HostSnapshot) -> Self {
        Sample {
            timestamp: s.timestamp,
            cpu: s.cpu.usage,
            memory: s.memory.percentage,
            disk: s.disk.percentage,
            network_upload: s.network.upload,
            network_download: s.network.download,
            temperature: s.cpu.temperature,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub usage: f64,
    pub cores: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub total: u64,
    pub used: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    /// Transmit rate in bytes/sec (computed from previous snapshot).
    pub upload: f64,
    /// Receive rate in bytes/sec (computed from previous snapshot).
    pub download: f64,
    pub connections: u32,
}

/// Full host snapshot as produced by the collector on each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    pub timestamp: u64,
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    pub network: NetworkStats,
}
