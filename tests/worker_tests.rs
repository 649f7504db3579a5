// Collector worker: ingest path and a short live run against the host

mod common;

use common::full_sample;
use pulsewatch::aggregator::MetricsAggregator;
use pulsewatch::alerts::AlertEvaluator;
use pulsewatch::models::{AlertMetric, MetricsEvent};
use pulsewatch::sysinfo_repo::SysinfoRepo;
use pulsewatch::worker::{WorkerConfig, WorkerDeps, ingest, spawn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::broadcast;

#[test]
fn ingest_stores_sample_and_returns_alerts() {
    let aggregator = MetricsAggregator::new(10);
    let evaluator = AlertEvaluator::default();
    let alerts = ingest(&aggregator, &evaluator, full_sample(1000, 95.0, 10.0, 10.0)).unwrap();
    assert_eq!(aggregator.len(), 1);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].metric, AlertMetric::Cpu);
}

#[test]
fn ingest_rejects_invalid_sample_without_storing() {
    let aggregator = MetricsAggregator::new(10);
    let evaluator = AlertEvaluator::default();
    assert!(ingest(&aggregator, &evaluator, full_sample(1000, -5.0, 10.0, 10.0)).is_err());
    assert!(aggregator.is_empty());
}

#[tokio::test]
async fn worker_spawn_collects_broadcasts_and_shuts_down() {
    let aggregator = Arc::new(MetricsAggregator::new(100));
    let (tx, mut rx) = broadcast::channel::<MetricsEvent>(64);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let samples_collected_total = Arc::new(AtomicU64::new(0));

    let deps = WorkerDeps {
        sysinfo_repo: Arc::new(SysinfoRepo::new()),
        aggregator: aggregator.clone(),
        evaluator: Arc::new(AlertEvaluator::default()),
        tx,
        ws_connections: Arc::new(AtomicUsize::new(0)),
        samples_collected_total: samples_collected_total.clone(),
        shutdown_rx,
    };
    let config = WorkerConfig {
        sample_interval_ms: 25,
        stats_log_interval_secs: 3600,
    };

    let handle = spawn(deps, config);
    let event = tokio::time::timeout(tokio::time::Duration::from_secs(5), rx.recv())
        .await
        .expect("worker should broadcast within 5s")
        .expect("channel open");
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert!(event.sample.timestamp > 0);
    assert!(!aggregator.is_empty());
    assert_eq!(
        samples_collected_total.load(Ordering::Relaxed) as usize,
        aggregator.len()
    );
}
