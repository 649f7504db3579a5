// Windowed statistics returned by the query layer.

use serde::{Deserialize, Serialize};

/// Arithmetic means over a window, each rounded to 2 decimals. All zero when the window is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network_upload: f64,
    pub network_download: f64,
    pub temperature: f64,
    pub sample_count: usize,
}

/// Extremes of one metric. `has_data == false` means the window was empty: values are 0 and
/// timestamps are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakStats {
    pub has_data: bool,
    pub max: f64,
    pub max_timestamp: Option<u64>,
    pub min: f64,
    pub min_timestamp: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peaks {
    pub cpu: PeakStats,
    pub memory: PeakStats,
    pub disk: PeakStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

/// Direction of a metric across a window, comparing the means of its two halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub trend: TrendDirection,
    /// Percent change of the second-half mean over the first-half mean, 2 decimals.
    pub change_percent: f64,
    /// min(100, sample_count * 2).
    pub confidence: u32,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub cpu: TrendAnalysis,
    pub memory: TrendAnalysis,
    pub disk: TrendAnalysis,
}

/// Everything the dashboard needs for one trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub window_ms: u64,
    pub start_time: u64,
    pub end_time: u64,
    pub sample_count: usize,
    pub averages: Averages,
    pub peaks: Peaks,
    pub trends: Trends,
    pub generated_at: u64,
}
