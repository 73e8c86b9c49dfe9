//! Token Bucket algorithm implementation

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::SystemTime;

/// Tokens are tracked in thousandths so sub-token refills are not lost
const SCALE: u64 = 1000;

/// Lock-free token bucket.
///
/// A rate of `r` tokens per second adds `r` milli-tokens per millisecond.
#[derive(Debug)]
pub struct TokenBucket {
    milli_tokens: AtomicU64,
    /// Unix milliseconds of the last refill
    last_refill: AtomicI64,
    capacity: u32,
    refill_rate: u32,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_rate: u32) -> Self {
        Self {
            milli_tokens: AtomicU64::new(u64::from(capacity) * SCALE),
            last_refill: AtomicI64::new(Self::now_millis()),
            capacity,
            refill_rate,
        }
    }

    pub fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn max_milli_tokens(&self) -> u64 {
        u64::from(self.capacity) * SCALE
    }

    /// Move elapsed time into the bucket; only one caller wins each tick.
    fn refill(&self) {
        let now = Self::now_millis();
        let last = self.last_refill.load(Ordering::Acquire);
        let elapsed_ms = (now - last).max(0) as u64;
        if elapsed_ms == 0 {
            return;
        }

        if self
            .last_refill
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let added = elapsed_ms.saturating_mul(u64::from(self.refill_rate));
        let max = self.max_milli_tokens();
        let _ = self
            .milli_tokens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add(added).min(max))
            });
    }

    /// Take one token if available
    pub fn try_consume(&self) -> bool {
        self.try_consume_n(1)
    }

    pub fn try_consume_n(&self, n: u32) -> bool {
        self.refill();
        let cost = u64::from(n) * SCALE;

        self.milli_tokens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(cost)
            })
            .is_ok()
    }

    /// Whole tokens currently available
    pub fn available(&self) -> u32 {
        self.refill();
        (self.milli_tokens.load(Ordering::Acquire) / SCALE) as u32
    }

    /// Whole seconds until one token is available (at least 1 when empty)
    pub fn retry_after(&self) -> u64 {
        self.refill();
        let current = self.milli_tokens.load(Ordering::Acquire);
        if current >= SCALE {
            return 0;
        }
        let missing = SCALE - current;
        let rate = u64::from(self.refill_rate.max(1));
        let wait_ms = missing.div_ceil(rate);
        wait_ms.div_ceil(1000).max(1)
    }

    /// Unix milliseconds of the last refill
    pub fn last_activity(&self) -> i64 {
        self.last_refill.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_bucket_drains_to_capacity() {
        let bucket = TokenBucket::new(10, 1);

        for _ in 0..10 {
            assert!(bucket.try_consume());
        }
        assert!(!bucket.try_consume());
        assert_eq!(bucket.available(), 0);
    }

    #[test]
    fn test_bucket_refills_over_time() {
        let bucket = TokenBucket::new(5, 1000);
        for _ in 0..5 {
            assert!(bucket.try_consume());
        }

        std::thread::sleep(Duration::from_millis(10));
        assert!(bucket.try_consume());
    }

    #[test]
    fn test_refill_never_exceeds_capacity() {
        let bucket = TokenBucket::new(3, 1000);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(bucket.available(), 3);
    }

    #[test]
    fn test_retry_after_when_empty() {
        let bucket = TokenBucket::new(1, 1);
        assert_eq!(bucket.retry_after(), 0);
        assert!(bucket.try_consume());
        assert_eq!(bucket.retry_after(), 1);
    }
}
