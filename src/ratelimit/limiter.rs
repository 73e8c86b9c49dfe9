//! Per-client rate limiter

use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::task::JoinHandle;

use super::config::RateLimitConfig;
use super::token_bucket::TokenBucket;

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed {
        remaining: u32,
        limit: u32,
        reset_at: i64,
    },
    Denied {
        retry_after: u64,
        limit: u32,
        reset_at: i64,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// One token bucket per client key (usually the peer IP).
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Spend one token from `client`'s bucket
    pub fn check(&self, client: &str) -> RateLimitResult {
        if !self.config.enabled {
            return RateLimitResult::Allowed {
                remaining: u32::MAX,
                limit: 0,
                reset_at: 0,
            };
        }

        let limit = self.config.burst_size;
        let bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(limit, self.config.requests_per_second));

        let reset_at = bucket.last_activity() + 1_000;
        if bucket.try_consume() {
            RateLimitResult::Allowed {
                remaining: bucket.available(),
                limit,
                reset_at,
            }
        } else {
            RateLimitResult::Denied {
                retry_after: bucket.retry_after(),
                limit,
                reset_at,
            }
        }
    }

    /// Drop buckets idle for longer than the configured TTL
    pub fn cleanup_stale(&self) -> usize {
        let ttl_ms = (self.config.bucket_ttl_seconds * 1000) as i64;
        let now = TokenBucket::now_millis();
        let before = self.buckets.len();

        self.buckets
            .retain(|_, bucket| now - bucket.last_activity() < ttl_ms);

        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            tracing::debug!(
                removed = removed,
                buckets = self.buckets.len(),
                "Cleaned up stale rate limit buckets"
            );
        }
        removed
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            enabled: self.config.enabled,
            buckets: self.buckets.len(),
            requests_per_second: self.config.requests_per_second,
            burst_size: self.config.burst_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterStats {
    pub enabled: bool,
    pub buckets: usize,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Periodically sweep stale buckets until the task is aborted
pub fn spawn_cleanup_task(limiter: std::sync::Arc<RateLimiter>) -> JoinHandle<()> {
    let period = Duration::from_secs(limiter.config().cleanup_interval_seconds.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.cleanup_stale();
        }
    })
}
