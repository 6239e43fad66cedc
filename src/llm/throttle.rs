use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

/// Shortest pause allowed between classification calls.
pub const MIN_CLASSIFY_DELAY: Duration = Duration::from_secs(2);

/// Gate taken before every classification call.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn acquire(&self);
}

/// Blocks for a fixed delay before each call, whether or not the previous
/// call was recent. Delays shorter than [`MIN_CLASSIFY_DELAY`] are raised to it.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        if delay < MIN_CLASSIFY_DELAY {
            tracing::warn!(
                "Classification delay {:?} is below the {:?} minimum, using the minimum",
                delay,
                MIN_CLASSIFY_DELAY
            );
        }
        Self {
            delay: delay.max(MIN_CLASSIFY_DELAY),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(MIN_CLASSIFY_DELAY)
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn acquire(&self) {
        tracing::trace!("Throttling classification call for {:?}", self.delay);
        sleep(self.delay).await;
    }
}

/// No delay at all; for tests and offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

#[async_trait]
impl Throttle for Unthrottled {
    async fn acquire(&self) {}
}
