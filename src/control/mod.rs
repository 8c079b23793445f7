// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Keeps host-side parameters and the device's copies of them in agreement.
//!
//! A [ControlPort] is one parameter. A [ModulationBus] is a bank of them that
//! share an amount knob and a send schedule.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ControlPort, ModulationBus, ModulationLayout, PortConfig, PortConfigBuilder,
        RateLimiter, SendOutcome,
    };
}

pub use bus::{ModulationBus, ModulationLayout};
pub use port::{ControlPort, PortConfig, PortConfigBuilder, PortConfigBuilderError, SendOutcome};
pub use rate::RateLimiter;

mod bus;
mod port;
mod rate;
