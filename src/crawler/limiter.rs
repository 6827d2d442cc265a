//! Token-bucket rate limiter shared by every crawl task

use crate::config::{validate_rate_limit, CheckSpeed, SpeedLimits};
use crate::ConfigError;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

/// Errors returned while waiting for permits
#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("cannot wait for {requested} permits, burst capacity is {burst}")]
    InsufficientCapacity { requested: u32, burst: u32 },
}

/// Rate limiter bounding outbound request rate and burst
///
/// Tokens refill at `rate_per_second`; at most `burst` can be taken at once.
/// The limiter is internally synchronized and is shared by `Arc` across all
/// crawl tasks.
pub struct RateLimiter {
    inner: Governor<NotKeyed, InMemoryState, DefaultClock>,
    limits: SpeedLimits,
}

impl RateLimiter {
    /// Creates a rate limiter
    ///
    /// # Returns
    ///
    /// * `Ok(RateLimiter)` - The limiter, starting with a full bucket
    /// * `Err(ConfigError)` - The rate or burst is out of range
    pub fn new(rate_per_second: f64, burst: u32) -> Result<Self, ConfigError> {
        validate_rate_limit(rate_per_second, burst)?;

        let burst_size = NonZeroU32::new(burst)
            .ok_or_else(|| ConfigError::Validation("burst must be >= 1".to_string()))?;
        let period = Duration::from_secs_f64(1.0 / rate_per_second);
        let quota = Quota::with_period(period)
            .ok_or_else(|| {
                ConfigError::Validation(format!("invalid rate-per-second {}", rate_per_second))
            })?
            .allow_burst(burst_size);

        Ok(Self {
            inner: Governor::direct(quota),
            limits: SpeedLimits {
                rate_per_second,
                burst,
            },
        })
    }

    /// Creates a rate limiter from a rate/burst pair
    pub fn from_limits(limits: SpeedLimits) -> Result<Self, ConfigError> {
        Self::new(limits.rate_per_second, limits.burst)
    }

    /// Creates a rate limiter from a named speed preset
    pub fn from_speed(speed: CheckSpeed) -> Result<Self, ConfigError> {
        Self::from_limits(speed.limits())
    }

    /// The rate/burst pair this limiter enforces
    pub fn limits(&self) -> SpeedLimits {
        self.limits
    }

    /// Waits until one permit is available
    pub async fn wait(&self) -> Result<(), LimiterError> {
        self.wait_n(1).await
    }

    /// Waits until `n` permits are available at once
    ///
    /// Fails immediately when `n` exceeds the burst capacity, since such a
    /// request could never be granted.
    async fn wait_n(&self, n: u32) -> Result<(), LimiterError> {
        let Some(requested) = NonZeroU32::new(n) else {
            return Ok(());
        };

        self.inner
            .until_n_ready(requested)
            .await
            .map_err(|_| LimiterError::InsufficientCapacity {
                requested: n,
                burst: self.limits.burst,
            })
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rate_per_second", &self.limits.rate_per_second)
            .field("burst", &self.limits.burst)
            .finish()
    }
}
