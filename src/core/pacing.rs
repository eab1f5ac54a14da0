use crate::domain::ports::PacingPolicy;
use rand::{rng, Rng};
use std::time::Duration;

/// Uniformly random delay in `[min, max]`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(6))
    }
}

impl PacingPolicy for RandomDelay {
    fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng().random_range(min..=max))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl PacingPolicy for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PacingPolicy for NoDelay {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}

pub async fn pause(policy: &dyn PacingPolicy) {
    let delay = policy.next_delay();
    if !delay.is_zero() {
        tracing::debug!("⏳ Waiting {:?} before next request", delay);
        tokio::time::sleep(delay).await;
    }
}
