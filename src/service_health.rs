// Liveness probes for the services around the dashboard (HTTP GET or raw TCP connect).
// Each probe owns its own timer; check_all waits for every probe to finish.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::net::TcpStream;
use tracing::instrument;

use crate::aggregator::now_ms;
use crate::models::{Protocol, ServiceHealthResult, ServiceSpec, ServiceStatus};

pub struct ServiceHealthChecker {
    client: reqwest::Client,
    services: Vec<ServiceSpec>,
}

impl ServiceHealthChecker {
    /// Redirects are not followed: a 3xx answer already counts as healthy.
    /// Probes go straight to the target, never through an environment proxy.
    pub fn new(services: Vec<ServiceSpec>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .user_agent(crate::version::user_agent())
            .build()
            .map_err(|e| anyhow::anyhow!("http client: {}", e))?;
        Ok(Self { client, services })
    }

    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// Probes every configured service.
    pub async fn check_configured(&self) -> BTreeMap<String, ServiceHealthResult> {
        self.check_all(&self.services).await
    }

    /// Runs all probes concurrently. A hanging service costs at most its own timeout.
    pub async fn check_all(&self, specs: &[ServiceSpec]) -> BTreeMap<String, ServiceHealthResult> {
        join_all(specs.iter().map(|spec| self.check_one(spec)))
            .await
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect()
    }

    /// Never fails: timeouts and connection errors become an offline result.
    #[instrument(skip(self, spec), fields(service = %spec.name, protocol = ?spec.protocol))]
    pub async fn check_one(&self, spec: &ServiceSpec) -> ServiceHealthResult {
        let timeout = Duration::from_millis(spec.timeout_ms);
        let started = Instant::now();
        let outcome = match spec.protocol {
            Protocol::Http | Protocol::Https => self.probe_http(spec, timeout).await,
            Protocol::Tcp => probe_tcp(spec, timeout).await,
        };
        let response_time_ms = started.elapsed().as_millis() as u64;

        let (status, status_code, error) = match outcome {
            ProbeOutcome::Connected => (ServiceStatus::Online, None, None),
            ProbeOutcome::Responded(code) if (200..400).contains(&code) => {
                (ServiceStatus::Online, Some(code), None)
            }
            ProbeOutcome::Responded(code) => (
                ServiceStatus::Error,
                Some(code),
                Some(format!("unexpected status {}", code)),
            ),
            ProbeOutcome::TimedOut => (
                ServiceStatus::Offline,
                None,
                Some(format!("timed out after {}ms", spec.timeout_ms)),
            ),
            ProbeOutcome::Failed(e) => (ServiceStatus::Offline, None, Some(e)),
        };
        if status != ServiceStatus::Online {
            tracing::debug!(
                operation = "check_service",
                response_time_ms,
                error = error.as_deref().unwrap_or_default(),
                "service not healthy"
            );
        }

        ServiceHealthResult {
            name: spec.name.clone(),
            status,
            status_code,
            response_time_ms,
            last_checked_at: now_ms(),
            error,
        }
    }

    async fn probe_http(&self, spec: &ServiceSpec, timeout: Duration) -> ProbeOutcome {
        match self.client.get(spec.url()).timeout(timeout).send().await {
            Ok(resp) => ProbeOutcome::Responded(resp.status().as_u16()),
            Err(e) if e.is_timeout() => ProbeOutcome::TimedOut,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}

/// Terminal state of a single probe. Produced exactly once per probe.
enum ProbeOutcome {
    Connected,
    Responded(u16),
    TimedOut,
    Failed(String),
}

async fn probe_tcp(spec: &ServiceSpec, timeout: Duration) -> ProbeOutcome {
    match tokio::time::timeout(timeout, TcpStream::connect((spec.host.as_str(), spec.port))).await {
        Ok(Ok(_stream)) => ProbeOutcome::Connected,
        Ok(Err(e)) => ProbeOutcome::Failed(e.to_string()),
        Err(_) => ProbeOutcome::TimedOut,
    }
}
