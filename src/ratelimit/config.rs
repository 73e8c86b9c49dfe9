//! Rate limiting configuration

use serde::Deserialize;

/// Per-client request limits
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Sustained requests per second per client
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    /// Bucket capacity, i.e. how many requests a quiet client may fire at once
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
    /// How often stale buckets are swept, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Idle time after which a client's bucket is dropped, in seconds
    #[serde(default = "default_bucket_ttl")]
    pub bucket_ttl_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst_size() -> u32 {
    50
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_bucket_ttl() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
            cleanup_interval_seconds: default_cleanup_interval(),
            bucket_ttl_seconds: default_bucket_ttl(),
        }
    }
}
