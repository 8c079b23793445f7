// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::util::Rng;
use std::time::Duration;

/// Fires at most once per interval, driven by whatever elapsed time the caller
/// feeds it.
///
/// Many module instances may share one device. Each limiter starts at a random
/// point in its period so their bursts don't line up.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    interval: Duration,
    elapsed: Duration,
}
impl RateLimiter {
    #[allow(missing_docs)]
    pub fn new_with(interval: Duration, phase: Duration) -> Self {
        Self {
            interval,
            elapsed: phase,
        }
    }

    /// Starts somewhere random inside the first period.
    pub fn new_with_phase(interval: Duration, rng: &mut Rng) -> Self {
        Self::new_with(interval, rng.rand_phase(interval))
    }

    /// Advances by `delta`. Returns true, and starts the next period, once a
    /// full interval has accumulated.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    #[allow(missing_docs)]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
