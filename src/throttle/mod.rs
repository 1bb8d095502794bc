//! Pause policy between harvest iterations
//!
//! The harvester never sleeps on its own; it asks a [`Pacer`] after every
//! iteration. [`JitterPacer`] waits a uniformly random whole number of
//! seconds, which is the only rate limit applied to the article source.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use crate::config::ThrottleConfig;

/// Decides how long to wait between iterations and waits
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Delay to apply before the next iteration
    fn next_delay(&self) -> Duration;

    /// Sleep for [`Pacer::next_delay`], returning the delay used
    async fn pause(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_secs = delay.as_secs(), "Pausing before next request");
            tokio::time::sleep(delay).await;
        }
        delay
    }
}

/// Random pause in `[min_secs, max_secs]` whole seconds (both inclusive)
#[derive(Debug, Clone)]
pub struct JitterPacer {
    min_secs: u64,
    max_secs: u64,
}

impl JitterPacer {
    /// Create a pacer; bounds are swapped if given in the wrong order
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.min_pause_secs, config.max_pause_secs)
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_secs(self.min_secs),
            Duration::from_secs(self.max_secs),
        )
    }
}

impl Default for JitterPacer {
    fn default() -> Self {
        Self::from_config(&ThrottleConfig::default())
    }
}

#[async_trait]
impl Pacer for JitterPacer {
    fn next_delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

/// Pacer that never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}
