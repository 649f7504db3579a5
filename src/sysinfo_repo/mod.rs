// Host snapshot collection via sysinfo

mod linux;

use crate::models::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::{Components, Disks, Networks, System};
use tracing::instrument;

/// Cumulative interface counters from the previous network read.
struct NetworkCounters {
    received: u64,
    transmitted: u64,
    at: Instant,
}

/// Last CPU refresh. `usage` stays `None` until a second refresh produced a real delta.
#[derive(Debug, Clone, Copy)]
struct CpuReading {
    at: Instant,
    usage: Option<f64>,
}

#[derive(Debug, PartialEq)]
enum CpuRefresh {
    Cached(f64),
    /// Sleep this long before refreshing so the delta spans the sysinfo minimum.
    WaitThenRefresh(Duration),
    Refresh,
}

impl CpuReading {
    fn plan(&self, now: Instant) -> CpuRefresh {
        let elapsed = now.duration_since(self.at);
        match self.usage {
            Some(usage) if elapsed < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL => {
                CpuRefresh::Cached(usage)
            }
            None if elapsed < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL => {
                CpuRefresh::WaitThenRefresh(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - elapsed)
            }
            _ => CpuRefresh::Refresh,
        }
    }
}

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    components: Arc<std::sync::Mutex<Components>>,
    last_network: Arc<std::sync::Mutex<Option<NetworkCounters>>>,
    last_cpu_refresh: Arc<std::sync::Mutex<CpuReading>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    /// Refreshes everything once so the first snapshot's cpu and network rates are real deltas
    /// against this baseline.
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let networks = Networks::new_with_refreshed_list();
        let (received, transmitted) = network_totals(&networks);
        let now = Instant::now();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(Disks::new_with_refreshed_list())),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            components: Arc::new(std::sync::Mutex::new(
                Components::new_with_refreshed_list(),
            )),
            last_network: Arc::new(std::sync::Mutex::new(Some(NetworkCounters {
                received,
                transmitted,
                at: now,
            }))),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(CpuReading {
                at: now,
                usage: None,
            })),
        }
    }

    /// One full host snapshot (cpu, memory, disk, network) stamped with `timestamp`.
    pub async fn get_snapshot(&self, timestamp: u64) -> anyhow::Result<HostSnapshot> {
        let cpu = self.get_cpu_stats().await?;
        let memory = self.get_memory_stats().await?;
        let disk = self.get_disk_stats().await?;
        let network = self.get_network_stats().await?;
        Ok(HostSnapshot {
            timestamp,
            cpu,
            memory,
            disk,
            network,
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_cpu_stats"))]
    pub async fn get_cpu_stats(&self) -> anyhow::Result<CpuStats> {
        let sys = self.sys.clone();
        let components = self.components.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let usage = match last_cpu_refresh.lock() {
                Ok(mut reading) => match reading.plan(Instant::now()) {
                    CpuRefresh::Cached(usage) => usage,
                    plan => {
                        if let CpuRefresh::WaitThenRefresh(wait) = plan {
                            std::thread::sleep(wait);
                        }
                        sys.refresh_cpu_all();
                        let usage = sys.global_cpu_usage() as f64;
                        *reading = CpuReading {
                            at: Instant::now(),
                            usage: Some(usage),
                        };
                        usage
                    }
                },
                Err(_) => {
                    sys.refresh_cpu_all();
                    sys.global_cpu_usage() as f64
                }
            };

            let temperature = match components.lock() {
                Ok(mut components) => {
                    components.refresh(false);
                    components
                        .list()
                        .iter()
                        .filter_map(|c| c.temperature())
                        .map(f64::from)
                        .filter(|t| t.is_finite())
                        .fold(0.0, f64::max)
                }
                Err(_) => 0.0,
            };

            Ok(CpuStats {
                usage: usage.clamp(0.0, 100.0),
                cores: sys.cpus().len() as u32,
                temperature,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_memory_stats"))]
    pub async fn get_memory_stats(&self) -> anyhow::Result<MemoryStats> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            Ok(MemoryStats {
                total,
                used,
                percentage: percent(used, total),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Totals across all mounted disks.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_disk_stats"))]
    pub async fn get_disk_stats(&self) -> anyhow::Result<DiskStats> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(false);
            let (total, available) = disks_guard
                .list()
                .iter()
                .fold((0u64, 0u64), |(t, a), d| {
                    (
                        t.saturating_add(d.total_space()),
                        a.saturating_add(d.available_space()),
                    )
                });
            let used = total.saturating_sub(available);
            Ok(DiskStats {
                total,
                used,
                percentage: percent(used, total),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Upload/download rates are deltas of cumulative counters since the previous call
    /// (or since construction, for the first call).
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_network_stats"))]
    pub async fn get_network_stats(&self) -> anyhow::Result<NetworkStats> {
        let networks = self.networks.clone();
        let last_network = self.last_network.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let (received, transmitted) = network_totals(&networks_guard);

            let now = Instant::now();
            let mut upload = 0.0;
            let mut download = 0.0;
            if let Ok(mut guard) = last_network.lock() {
                if let Some(prev) = guard.as_ref() {
                    let dt_secs = now.duration_since(prev.at).as_secs_f64();
                    if dt_secs > 0.0 {
                        download = received.saturating_sub(prev.received) as f64 / dt_secs;
                        upload = transmitted.saturating_sub(prev.transmitted) as f64 / dt_secs;
                    }
                }
                *guard = Some(NetworkCounters {
                    received,
                    transmitted,
                    at: now,
                });
            }

            Ok(NetworkStats {
                upload,
                download,
                connections: linux::count_tcp_connections(),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

/// Cumulative (received, transmitted) bytes summed over all interfaces.
fn network_totals(networks: &Networks) -> (u64, u64) {
    networks
        .list()
        .values()
        .fold((0u64, 0u64), |(rx, tx), data| {
            (
                rx.saturating_add(data.total_received()),
                tx.saturating_add(data.total_transmitted()),
            )
        })
}

fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        ((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
