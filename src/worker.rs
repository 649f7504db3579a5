// Background collector: one host snapshot per tick → store → alert evaluation → broadcast.

use crate::aggregator::{MetricsAggregator, now_ms};
use crate::alerts::AlertEvaluator;
use crate::models::{AlertSnapshot, MetricsEvent, Sample, TriggeredAlert};
use crate::sysinfo_repo::SysinfoRepo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" message (avoid logging every tick when no one is on /ws/metrics)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state, channels, and shutdown for the worker.
pub struct WorkerDeps {
    pub sysinfo_repo: Arc<SysinfoRepo>,
    pub aggregator: Arc<MetricsAggregator>,
    pub evaluator: Arc<AlertEvaluator>,
    pub tx: broadcast::Sender<MetricsEvent>,
    pub ws_connections: Arc<AtomicUsize>,
    pub samples_collected_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Stores one sample and returns the alerts it triggers. Shared by the worker and tests.
pub fn ingest(
    aggregator: &MetricsAggregator,
    evaluator: &AlertEvaluator,
    sample: Sample,
) -> Result<Vec<TriggeredAlert>, crate::error::MetricsError> {
    aggregator.add_sample(sample)?;
    let alerts = evaluator.evaluate(&AlertSnapshot::from(&sample))?;
    for alert in &alerts {
        tracing::warn!(
            metric = %alert.metric,
            value = alert.value,
            threshold = alert.threshold,
            severity = %alert.level,
            "{}",
            alert.message
        );
    }
    Ok(alerts)
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        sysinfo_repo,
        aggregator,
        evaluator,
        tx,
        ws_connections,
        samples_collected_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);

    let task = async move {
        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_no_receivers_warn: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let snapshot = match sysinfo_repo.get_snapshot(now_ms()).await {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "get_snapshot",
                                "host snapshot failed"
                            );
                            continue;
                        }
                    };
                    let sample = Sample::from(&snapshot);
                    let alerts = match ingest(&aggregator, &evaluator, sample) {
                        Ok(alerts) => alerts,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "add_sample",
                                "sample rejected"
                            );
                            continue;
                        }
                    };
                    samples_collected_total.fetch_add(1, Ordering::Relaxed);

                    if tx.send(MetricsEvent { sample, alerts }).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_sample",
                                "No active WebSocket clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        ws_clients = ws_connections.load(Ordering::Relaxed),
                        samples_stored = aggregator.len(),
                        memory_footprint_bytes = aggregator.memory_footprint_bytes(),
                        samples_collected_total = samples_collected_total.load(Ordering::Relaxed),
                        "app stats"
                    );
                }
            }
        }
    };
    tokio::spawn(task.instrument(worker_span))
}
