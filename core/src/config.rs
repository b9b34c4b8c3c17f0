//! Connection pool configuration.
//!
//! # Design
//! `PoolConfig` is passed to `HttpFacade::new` once and never mutated. It
//! derives serde so a host application can embed it in its own config file;
//! every field has a default, so partial tables deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FacadeError, Result};

/// Limits and timeouts applied to every request issued by one facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum connections open at once across all routes. Also caps the
    /// idle connections kept for reuse.
    pub max_total_connections: usize,
    /// Maximum connections open at once to one scheme, host, and port.
    pub max_connections_per_route: usize,
    pub connect_timeout_ms: u64,
    /// How long a request waits for a free connection slot before failing
    /// with `FacadeError::PoolTimeout`.
    pub acquire_timeout_ms: u64,
    /// Limit for receiving the response head, and separately for reading the
    /// whole body. The body limit covers the entire download rather than
    /// each individual read, so a slow but steady body can still hit it.
    pub read_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_total_connections: 200,
            max_connections_per_route: 10,
            connect_timeout_ms: 5_000,
            acquire_timeout_ms: 5_000,
            read_timeout_ms: 10_000,
            user_agent: concat!("http-facade/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl PoolConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Reject zero limits, zero timeouts, and a per-route limit larger than
    /// the total.
    pub fn validate(&self) -> Result<()> {
        if self.max_total_connections == 0 || self.max_connections_per_route == 0 {
            return Err(FacadeError::InvalidConfig(
                "connection limits must be greater than zero".to_string(),
            ));
        }
        if self.max_connections_per_route > self.max_total_connections {
            return Err(FacadeError::InvalidConfig(format!(
                "max_connections_per_route ({}) exceeds max_total_connections ({})",
                self.max_connections_per_route, self.max_total_connections
            )));
        }
        let timeouts = [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("acquire_timeout_ms", self.acquire_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, ms)| *ms == 0) {
            return Err(FacadeError::InvalidConfig(format!(
                "{name} must be greater than zero"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pool_limits() {
        let config = PoolConfig::default();
        assert_eq!(config.max_total_connections, 200);
        assert_eq!(config.max_connections_per_route, 10);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
        assert_eq!(config.read_timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("http-facade/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PoolConfig = serde_json::from_str(r#"{"read_timeout_ms":250}"#).unwrap();
        assert_eq!(config.read_timeout_ms, 250);
        assert_eq!(config.max_total_connections, 200);
        assert_eq!(config.connect_timeout_ms, 5_000);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let config = PoolConfig {
            max_total_connections: 0,
            ..PoolConfig::default()
        };
        assert!(matches!(config.validate(), Err(FacadeError::InvalidConfig(_))));
    }

    #[test]
    fn per_route_above_total_is_rejected() {
        let config = PoolConfig {
            max_total_connections: 5,
            max_connections_per_route: 6,
            ..PoolConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_connections_per_route"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = PoolConfig {
            acquire_timeout_ms: 0,
            ..PoolConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("acquire_timeout_ms"));
    }
}
