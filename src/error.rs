// Errors surfaced by the metrics core. Wiring code (config, main, worker) uses anyhow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid sample: {field} = {value}")]
    InvalidSample { field: &'static str, value: f64 },

    #[error("invalid alert snapshot: {field} = {value}")]
    InvalidSnapshot { field: &'static str, value: f64 },

    #[error("sample at {timestamp} is older than the latest stored sample at {latest}")]
    OutOfOrder { timestamp: u64, latest: u64 },

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv export produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
