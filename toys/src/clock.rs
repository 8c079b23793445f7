// Copyright (c) 2023 Mike Tsao. All rights reserved.

use eagan_sync_core::traits::Clock;
use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// A [Clock] that moves only when told to. Clones share the same time, so a
/// test can keep one and hand another to the code under test.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<Instant>>);
impl Default for ManualClock {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }
}
impl ManualClock {
    pub fn advance(&self, delta: Duration) {
        if let Ok(mut now) = self.0.lock() {
            *now += delta;
        }
    }
}
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.0.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
