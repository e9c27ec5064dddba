//! Token bucket rate limiting for outbound provider calls
//!
//! The geocoding provider enforces a request budget; exceeding it gets the
//! key throttled. The limiter fails fast instead of queueing: a speculative
//! lookup that cannot run now is simply skipped.
//!
//! # Example
//!
//! ```rust
//! use savemate_core::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_second(1));
//! assert!(limiter.try_acquire());
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Extra requests allowed in short bursts
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_second(1)
    }
}

impl RateLimitConfig {
    /// Strict limit, no burst
    #[must_use]
    pub fn strict(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            burst: 0,
        }
    }

    /// Per-second limit with a burst of one extra request per allowed request
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: max,
        }
    }

    fn capacity(&self) -> f64 {
        f64::from(self.max_requests) + f64::from(self.burst)
    }

    fn refill_rate(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64()
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

/// Single-bucket rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        let bucket = Bucket {
            tokens: config.capacity(),
            last_update: Instant::now(),
        };
        Self {
            config,
            bucket: Mutex::new(bucket),
        }
    }

    /// Take one token if available
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        // A poisoned bucket still holds a usable token count
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Time until the next token is available
    #[must_use]
    pub fn time_until_available(&self) -> Duration {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            return Duration::ZERO;
        }
        let rate = self.config.refill_rate();
        if rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::from_secs_f64((1.0 - bucket.tokens) / rate)
    }

    /// Refill the bucket to capacity
    pub fn reset(&self) {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        bucket.tokens = self.config.capacity();
        bucket.last_update = Instant::now();
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_update);
        let new_tokens = elapsed.as_secs_f64() * self.config.refill_rate();

        bucket.tokens = (bucket.tokens + new_tokens).min(self.config.capacity());
        bucket.last_update = now;
    }
}
