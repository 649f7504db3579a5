// Linux-specific helpers: /proc/net connection table.

/// Count of TCP sockets listed in /proc/net/tcp and /proc/net/tcp6 (Linux). 0 elsewhere.
pub(super) fn count_tcp_connections() -> u32 {
    #[cfg(target_os = "linux")]
    {
        ["/proc/net/tcp", "/proc/net/tcp6"]
            .iter()
            .filter_map(|path| std::fs::read_to_string(path).ok())
            .map(|content| count_table_rows(&content))
            .sum()
    }
    #[cfg(not(target_os = "linux"))]
    0
}

/// Rows after the header line.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn count_table_rows(content: &str) -> u32 {
    content
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .count()
        .min(u32::MAX as usize) as u32
}
