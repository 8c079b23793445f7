// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Spreads traffic from many module instances across time.

use byteorder::{BigEndian, ByteOrder};
use std::time::Duration;

/// Picks starting phases for rate limiters. Not for anything that needs
/// unpredictability.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    /// Seeds from the OS. Panics if the OS has no entropy to give.
    fn default() -> Self {
        Self::new_with_seed(Self::generate_seed().unwrap())
    }
}
impl Rng {
    /// Same seed, same phases.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    #[allow(missing_docs)]
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    /// Somewhere in `[0, period)`.
    pub fn rand_phase(&mut self, period: Duration) -> Duration {
        period.mul_f64(self.0.rand_float())
    }
}
