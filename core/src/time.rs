// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::traits::Clock;
use std::time::Instant;

/// The wall clock, as seen through [Instant].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
