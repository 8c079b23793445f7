// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Types and traits shared across the eagan-sync crates.

/// Failures that can come back from a transport.
pub mod error;
/// Host-side identifiers.
pub mod ids;
/// MIDI vocabulary.
pub mod midi;
/// Wall-clock time.
pub mod time;
/// Describes major system interfaces.
pub mod traits;
/// Ranged and fixed-width value types.
pub mod types;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::error::TransportError;
    pub use super::ids::{ClientTag, InputId, LightId, ParamId};
    pub use super::midi::prelude::*;
    pub use super::time::SystemClock;
    pub use super::traits::prelude::*;
    pub use super::types::prelude::*;
}
