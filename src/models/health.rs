// Service probe targets and their results.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Tcp,
}

/// One service to probe. `path` is only used for http(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_timeout_ms", alias = "timeout_ms")]
    pub timeout_ms: u64,
}

fn default_host() -> String {
    "localhost".into()
}

fn default_path() -> String {
    "/".into()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl ServiceSpec {
    pub fn http(name: &str, port: u16, path: &str) -> Self {
        Self {
            name: name.into(),
            host: default_host(),
            port,
            protocol: Protocol::Http,
            path: path.into(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn tcp(name: &str, port: u16) -> Self {
        Self {
            name: name.into(),
            host: default_host(),
            port,
            protocol: Protocol::Tcp,
            path: default_path(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Request URL for http(s) probes.
    pub fn url(&self) -> String {
        let scheme = match self.protocol {
            Protocol::Https => "https",
            _ => "http",
        };
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("{}://{}:{}{}", scheme, self.host, self.port, path)
    }
}

/// The dashboard stack: frontend, backend, postgres, redis, mqtt, grafana, prometheus.
pub fn default_services() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec::http("frontend", 5173, "/"),
        ServiceSpec::http("backend", 3001, "/api/monitoring/health"),
        ServiceSpec::tcp("postgres", 5432),
        ServiceSpec::tcp("redis", 6379),
        ServiceSpec::tcp("mqtt", 1883),
        ServiceSpec::http("grafana", 3000, "/api/health"),
        ServiceSpec::http("prometheus", 9090, "/-/healthy"),
    ]
}

/// Probe outcome; serializes lowercase ("online").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealthResult {
    pub name: String,
    pub status: ServiceStatus,
    /// HTTP status, when an http(s) response was received.
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    /// Milliseconds since epoch.
    pub last_checked_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealthResult {
    pub fn is_online(&self) -> bool {
        self.status == ServiceStatus::Online
    }
}
