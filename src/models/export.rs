// Export formats and payloads.

use serde::{Deserialize, Serialize};

use super::Sample;

pub const CSV_HEADER: [&str; 7] = [
    "timestamp",
    "cpu",
    "memory",
    "disk",
    "network_upload",
    "network_download",
    "temperature",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Case-insensitive; anything other than "csv" is JSON.
    pub fn parse_or_default(s: &str) -> Self {
        if s.eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_points: usize,
    /// Timestamp of the first exported sample.
    pub start_time: Option<u64>,
    /// Timestamp of the last exported sample.
    pub end_time: Option<u64>,
    pub exported_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExport {
    pub data: Vec<Sample>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvExport {
    /// `metrics_<exportedAt>.csv`
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    Json(JsonExport),
    Csv(CsvExport),
}
