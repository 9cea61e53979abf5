//! Tunables consumed by the aggregation layer.

use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECONDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Worker pool size for provider calls
    pub max_workers: usize,
    /// Per-call timeout
    pub timeout: Duration,
    /// Cache time-to-live
    pub cache_ttl: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
        }
    }
}
