// Build-time identity from Cargo.toml

/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// User-Agent sent by outbound health probes, e.g. `pulsewatch/0.3.0`.
pub fn user_agent() -> String {
    format!("{NAME}/{VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_joins_name_and_version() {
        assert_eq!(user_agent(), format!("pulsewatch/{}", VERSION));
    }
}
