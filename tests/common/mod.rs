// Shared test helpers

#![allow(dead_code)]

use pulsewatch::models::*;

pub fn sample(timestamp: u64, cpu: f64) -> Sample {
    Sample {
        timestamp,
        cpu,
        memory: 0.0,
        disk: 0.0,
        network_upload: 0.0,
        network_download: 0.0,
        temperature: 0.0,
    }
}

pub fn full_sample(timestamp: u64, cpu: f64, memory: f64, disk: f64) -> Sample {
    Sample {
        timestamp,
        cpu,
        memory,
        disk,
        network_upload: 1500.0,
        network_download: 3000.0,
        temperature: 45.0,
    }
}

pub const TEST_CONFIG: &str = r#"
[server]
port = 3001
host = "0.0.0.0"

[monitoring]
sample_interval_ms = 5000
stats_log_interval_secs = 60

[store]
max_samples = 100

[publishing]
broadcast_capacity = 10
"#;
