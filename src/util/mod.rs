// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Useful things that don't have anything to do with the device itself.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Rng, SyncSettings};
}

pub use rng::Rng;
pub use settings::SyncSettings;

mod rng;
pub mod settings;
