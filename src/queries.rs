// Window statistics over a time-ordered slice of samples. Pure: nothing here touches the store.

use crate::models::{
    Averages, Metric, MetricsSummary, PeakStats, Peaks, Sample, TrendAnalysis, TrendDirection,
    Trends,
};

/// Percent change beyond which a trend is no longer "stable".
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Round half away from zero to 2 decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `[now - window_ms, now]`, clamped at 0.
pub fn trailing_window(now_ms: u64, window_ms: u64) -> (u64, u64) {
    (now_ms.saturating_sub(window_ms), now_ms)
}

fn mean_f64(v: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = v.len();
    if n == 0 {
        return 0.0;
    }
    v.sum::<f64>() / (n as f64)
}

pub fn averages(samples: &[Sample]) -> Averages {
    if samples.is_empty() {
        return Averages::default();
    }
    let avg = |metric: Metric| round2(mean_f64(samples.iter().map(|s| s.value(metric))));
    Averages {
        cpu: avg(Metric::Cpu),
        memory: avg(Metric::Memory),
        disk: avg(Metric::Disk),
        network_upload: avg(Metric::NetworkUpload),
        network_download: avg(Metric::NetworkDownload),
        temperature: avg(Metric::Temperature),
        sample_count: samples.len(),
    }
}

/// Max/min of one metric with the timestamp where each first occurred.
pub fn peak(samples: &[Sample], metric: Metric) -> PeakStats {
    let Some(first) = samples.first() else {
        return PeakStats::default();
    };
    let mut out = PeakStats {
        has_data: true,
        max: first.value(metric),
        max_timestamp: Some(first.timestamp),
        min: first.value(metric),
        min_timestamp: Some(first.timestamp),
    };
    for s in &samples[1..] {
        let v = s.value(metric);
        if v > out.max {
            out.max = v;
            out.max_timestamp = Some(s.timestamp);
        }
        if v < out.min {
            out.min = v;
            out.min_timestamp = Some(s.timestamp);
        }
    }
    out
}

pub fn peaks(samples: &[Sample]) -> Peaks {
    Peaks {
        cpu: peak(samples, Metric::Cpu),
        memory: peak(samples, Metric::Memory),
        disk: peak(samples, Metric::Disk),
    }
}

/// Compares the mean of the first half (by index) with the mean of the second half.
/// Fewer than 2 samples, or a first-half mean of 0, reports a stable 0% change.
pub fn trend(samples: &[Sample], metric: Metric) -> TrendAnalysis {
    let n = samples.len();
    if n < 2 {
        return TrendAnalysis {
            sample_count: n,
            ..TrendAnalysis::default()
        };
    }
    let mid = n / 2;
    let first_mean = mean_f64(samples[..mid].iter().map(|s| s.value(metric)));
    let second_mean = mean_f64(samples[mid..].iter().map(|s| s.value(metric)));

    let change = if first_mean == 0.0 {
        0.0
    } else {
        (second_mean - first_mean) / first_mean * 100.0
    };
    let change = if change.is_finite() { change } else { 0.0 };

    let direction = if change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    TrendAnalysis {
        trend: direction,
        change_percent: round2(change),
        confidence: confidence(n),
        sample_count: n,
    }
}

/// Saturates at 100 once the window holds 50 samples.
pub fn confidence(sample_count: usize) -> u32 {
    sample_count.saturating_mul(2).min(100) as u32
}

/// Averages, peaks and cpu/memory/disk trends for the samples of `[start_ms, end_ms]`.
pub fn summarize(
    samples: &[Sample],
    start_ms: u64,
    end_ms: u64,
    generated_at: u64,
) -> MetricsSummary {
    MetricsSummary {
        window_ms: end_ms.saturating_sub(start_ms),
        start_time: start_ms,
        end_time: end_ms,
        sample_count: samples.len(),
        averages: averages(samples),
        peaks: peaks(samples),
        trends: Trends {
            cpu: trend(samples, Metric::Cpu),
            memory: trend(samples, Metric::Memory),
            disk: trend(samples, Metric::Disk),
        },
        generated_at,
    }
}
