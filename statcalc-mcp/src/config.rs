//! Server configuration from the environment

use std::env;

const DEFAULT_SERVER_NAME: &str = "statcalc";
const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Name advertised in the `initialize` response
    pub server_name: String,
    /// `tracing` filter directive, e.g. `info` or `statcalc_plugin=debug`
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. `STATCALC_LOG` wins over `RUST_LOG`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            server_name: non_empty("STATCALC_SERVER_NAME")
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            log_filter: non_empty("STATCALC_LOG")
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = ServerConfig::default();
        assert_eq!(c.server_name, "statcalc");
        assert_eq!(c.log_filter, "info");
    }

    #[test]
    fn test_statcalc_log_wins() {
        let c = config(&[("STATCALC_LOG", "debug"), ("RUST_LOG", "warn")]);
        assert_eq!(c.log_filter, "debug");
    }

    #[test]
    fn test_rust_log_fallback() {
        assert_eq!(config(&[("RUST_LOG", "warn")]).log_filter, "warn");
        assert_eq!(config(&[("STATCALC_LOG", " "), ("RUST_LOG", "warn")]).log_filter, "warn");
    }

    #[test]
    fn test_server_name_override() {
        assert_eq!(config(&[("STATCALC_SERVER_NAME", "stats")]).server_name, "stats");
    }
}
