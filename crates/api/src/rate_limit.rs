//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-IP limits on the classify endpoints using tower_governor.
//! Inference is the only expensive thing this server does, so the page,
//! health and metrics routes are left unlimited.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether classify requests are limited at all
    pub enabled: bool,
    /// Seconds between quota replenishments
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 5,
        }
    }
}

/// Build the governor config, or `None` when limiting is disabled or the
/// settings are unusable (zero period or burst).
///
/// Peer IPs are read from `ConnectInfo`, so the service must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<DefaultGovernorConfig>> {
    if !config.enabled {
        return None;
    }

    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.per_second, 2);
        assert_eq!(config.burst_size, 5);
    }

    #[test]
    fn test_create_governor_config() {
        let governor = create_governor_config(&RateLimitConfig::default());
        assert!(governor.is_some());
    }

    #[test]
    fn test_disabled_has_no_governor() {
        let config = RateLimitConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(create_governor_config(&config).is_none());
    }

    #[test]
    fn test_zero_burst_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..Default::default()
        };
        assert!(create_governor_config(&config).is_none());
    }
}
