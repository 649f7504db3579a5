// MetricsAggregator: the one SampleStore of the process, shared by the collector worker and the
// HTTP handlers. Built once in main and passed around as Arc<MetricsAggregator>.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::MetricsError;
use crate::export;
use crate::models::{
    Averages, ExportFormat, ExportOutput, Metric, MetricsSummary, Peaks, Sample, TrendAnalysis,
};
use crate::queries;
use crate::store::SampleStore;

/// Milliseconds since epoch (0 if the clock is before the epoch).
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

pub struct MetricsAggregator {
    store: RwLock<SampleStore>,
}

impl MetricsAggregator {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: RwLock::new(SampleStore::new(capacity)),
        }
    }

    // The store holds plain data, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, SampleStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SampleStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Validates then appends. Appends are serialized by the write lock.
    ///
    /// A sample older than the latest stored one is rejected so the buffer stays in
    /// non-decreasing timestamp order; equal timestamps are accepted.
    pub fn add_sample(&self, sample: Sample) -> Result<(), MetricsError> {
        sample.validate()?;
        let mut store = self.write();
        if let Some(latest) = store.latest()
            && sample.timestamp < latest.timestamp
        {
            return Err(MetricsError::OutOfOrder {
                timestamp: sample.timestamp,
                latest: latest.timestamp,
            });
        }
        store.append(sample);
        Ok(())
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    pub fn memory_footprint_bytes(&self) -> usize {
        self.read().estimated_memory_footprint()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.read().latest().copied()
    }

    pub fn tail(&self, n: usize) -> Vec<Sample> {
        self.read().tail(n)
    }

    /// Samples in `[start_ms, end_ms]`, copied out so the lock is released before any math.
    pub fn range(&self, start_ms: u64, end_ms: u64) -> Vec<Sample> {
        self.read().range(start_ms, end_ms).copied().collect()
    }

    pub fn averages(&self, start_ms: u64, end_ms: u64) -> Averages {
        queries::averages(&self.range(start_ms, end_ms))
    }

    pub fn peaks(&self, start_ms: u64, end_ms: u64) -> Peaks {
        queries::peaks(&self.range(start_ms, end_ms))
    }

    /// Trend of `metric` over the trailing `window_ms`, ending now.
    pub fn trend(&self, metric: Metric, window_ms: u64) -> TrendAnalysis {
        self.trend_at(metric, window_ms, now_ms())
    }

    pub fn trend_at(&self, metric: Metric, window_ms: u64, now_ms: u64) -> TrendAnalysis {
        let (start, end) = queries::trailing_window(now_ms, window_ms);
        queries::trend(&self.range(start, end), metric)
    }

    pub fn summary(&self, window_ms: u64) -> MetricsSummary {
        self.summary_at(window_ms, now_ms())
    }

    pub fn summary_at(&self, window_ms: u64, now_ms: u64) -> MetricsSummary {
        let (start, end) = queries::trailing_window(now_ms, window_ms);
        queries::summarize(&self.range(start, end), start, end, now_ms)
    }

    /// Exports `[start, end]` when both bounds are given, otherwise the whole store.
    pub fn export(
        &self,
        format: ExportFormat,
        start_ms: Option<u64>,
        end_ms: Option<u64>,
    ) -> Result<ExportOutput, MetricsError> {
        self.export_at(format, start_ms, end_ms, now_ms())
    }

    pub fn export_at(
        &self,
        format: ExportFormat,
        start_ms: Option<u64>,
        end_ms: Option<u64>,
        exported_at: u64,
    ) -> Result<ExportOutput, MetricsError> {
        let samples = match (start_ms, end_ms) {
            (Some(start), Some(end)) => self.range(start, end),
            _ => self.read().iter().copied().collect(),
        };
        export::export(&samples, format, exported_at)
    }
}
