// Domain models

mod alert;
mod export;
mod health;
mod metric;
mod query;
mod sample;

pub use alert::{AlertRule, AlertSnapshot, Severity, TriggeredAlert, default_rules};
pub use export::{CSV_HEADER, CsvExport, ExportFormat, ExportMetadata, ExportOutput, JsonExport};
pub use health::{Protocol, ServiceHealthResult, ServiceSpec, ServiceStatus, default_services};
pub use metric::{AlertMetric, Metric};
pub use query::{
    Averages, MetricsSummary, PeakStats, Peaks, TrendAnalysis, TrendDirection, Trends,
};
pub use sample::{CpuStats, DiskStats, HostSnapshot, MemoryStats, NetworkStats, Sample};

/// Broadcast to WebSocket clients once per collector tick.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricsEvent {
    pub sample: Sample,
    pub alerts: Vec<TriggeredAlert>,
}
