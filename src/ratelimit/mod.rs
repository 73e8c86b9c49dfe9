//! Per-client rate limiting using the Token Bucket algorithm.
//!
//! Each client (keyed by peer IP) gets its own bucket; idle buckets are
//! swept by a background task.

mod config;
mod limiter;
mod token_bucket;

pub use config::RateLimitConfig;
pub use limiter::{spawn_cleanup_task, RateLimitResult, RateLimiter, RateLimiterStats};
pub use token_bucket::TokenBucket;
