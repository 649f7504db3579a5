// Service probes against local listeners

use axum::{Router, http::StatusCode, routing::get};
use pulsewatch::models::{ServiceSpec, ServiceStatus};
use pulsewatch::service_health::ServiceHealthChecker;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

/// A port that was free a moment ago: bound, then released.
async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

async fn spawn_http_server() -> u16 {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/fail", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/moved",
            get(|| async { (StatusCode::FOUND, [("location", "/health")]) }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    port
}

fn checker() -> ServiceHealthChecker {
    ServiceHealthChecker::new(vec![]).unwrap()
}

#[tokio::test]
async fn tcp_probe_to_unused_port_is_offline_without_hanging() {
    let port = unused_port().await;
    let spec = ServiceSpec::tcp("ghost", port)
        .with_host("127.0.0.1")
        .with_timeout_ms(100);
    let started = Instant::now();
    let result = checker().check_one(&spec).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(result.status, ServiceStatus::Offline);
    assert!(result.error.is_some());
    assert_eq!(result.status_code, None);
}

#[tokio::test]
async fn tcp_probe_to_listener_is_online() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let spec = ServiceSpec::tcp("db", port).with_host("127.0.0.1");
    let result = checker().check_one(&spec).await;
    assert_eq!(result.status, ServiceStatus::Online);
    assert!(result.error.is_none());
    assert!(result.last_checked_at > 0);
    drop(listener);
}

#[tokio::test]
async fn http_probe_2xx_and_3xx_are_online() {
    let port = spawn_http_server().await;
    let checker = checker();

    let ok = ServiceSpec::http("api", port, "/health").with_host("127.0.0.1");
    let result = checker.check_one(&ok).await;
    assert_eq!(result.status, ServiceStatus::Online);
    assert_eq!(result.status_code, Some(200));

    let moved = ServiceSpec::http("api", port, "/moved").with_host("127.0.0.1");
    let result = checker.check_one(&moved).await;
    assert_eq!(result.status, ServiceStatus::Online);
    assert_eq!(result.status_code, Some(302));
}

#[tokio::test]
async fn http_probe_5xx_is_error() {
    let port = spawn_http_server().await;
    let spec = ServiceSpec::http("api", port, "/fail").with_host("127.0.0.1");
    let result = checker().check_one(&spec).await;
    assert_eq!(result.status, ServiceStatus::Error);
    assert_eq!(result.status_code, Some(500));
    assert!(result.error.is_some());
}

#[tokio::test]
async fn http_probe_times_out() {
    let port = spawn_http_server().await;
    let spec = ServiceSpec::http("api", port, "/slow")
        .with_host("127.0.0.1")
        .with_timeout_ms(100);
    let started = Instant::now();
    let result = checker().check_one(&spec).await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(result.status, ServiceStatus::Offline);
    assert_eq!(result.status_code, None);
}

#[tokio::test]
async fn check_all_waits_for_every_probe_and_keys_by_name() {
    let port = spawn_http_server().await;
    let dead = unused_port().await;
    let specs = vec![
        ServiceSpec::http("web", port, "/health").with_host("127.0.0.1"),
        ServiceSpec::http("slow", port, "/slow")
            .with_host("127.0.0.1")
            .with_timeout_ms(150),
        ServiceSpec::tcp("cache", dead)
            .with_host("127.0.0.1")
            .with_timeout_ms(100),
    ];
    let started = Instant::now();
    let results = checker().check_all(&specs).await;
    // Bounded by the slowest probe's own timeout, not their sum or the handler's sleep.
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(results.len(), 3);
    assert_eq!(results["web"].status, ServiceStatus::Online);
    assert_eq!(results["slow"].status, ServiceStatus::Offline);
    assert_eq!(results["cache"].status, ServiceStatus::Offline);
}

#[tokio::test]
async fn check_configured_uses_constructor_services() {
    let dead = unused_port().await;
    let checker = ServiceHealthChecker::new(vec![
        ServiceSpec::tcp("mqtt", dead)
            .with_host("127.0.0.1")
            .with_timeout_ms(100),
    ])
    .unwrap();
    let results = checker.check_configured().await;
    assert_eq!(results.len(), 1);
    assert!(!results["mqtt"].is_online());
}
