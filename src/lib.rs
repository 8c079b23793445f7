// Copyright (c) 2023 Mike Tsao. All rights reserved.

#![warn(missing_docs)]

//! The `eagan-sync` crate keeps an EaganMatrix-based instrument in step with
//! the knobs, CV inputs, and preset browser of a host module.
//!
//! Two pieces do the work. A [ModulationBus](control::ModulationBus) owns a
//! bank of [ControlPort](control::ControlPort)s, one per device parameter, and
//! pushes whatever changed to the device at a steady rate. A
//! [PresetEnumerator](presets::PresetEnumerator) asks the device to load each
//! stored preset in turn so the host can catalog them.
//!
//! Neither piece talks to hardware directly. They go through a
//! [Transport](traits::Transport), and they read the host through a
//! [ModuleHost](traits::ModuleHost).

pub mod control;
pub mod presets;
pub mod transport;
pub mod util;

pub mod ids {
    //! Host-side identifiers.

    pub use eagan_sync_core::ids::{ClientTag, InputId, LightId, ParamId};
}

pub mod midi {
    //! The MIDI vocabulary the device speaks.

    pub use eagan_sync_core::midi::{
        cc, u4, u7, LiveEvent, MidiChannel, MidiMessage, PresetId, StreamId,
    };
    pub use crate::transport::MidiUtils;

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{cc, u7, MidiChannel, MidiMessage, PresetId, StreamId};
    }
}

pub mod traits {
    //! The seams between this crate and the outside world.

    pub use eagan_sync_core::traits::{
        Clock, HasSettings, LightTransition, ModuleHost, Transport,
    };

    /// The most commonly used imports.
    pub mod prelude {
        pub use super::{Clock, HasSettings, LightTransition, ModuleHost, Transport};
    }
}

pub mod types {
    //! Value types.

    pub use eagan_sync_core::{
        time::SystemClock,
        types::{Normal, Percentage, RangedF64, ValueDomain, U14},
    };
}

pub use error::StateError;
pub use eagan_sync_core::error::TransportError;

/// A collection of imports that are useful to users of this crate.
pub mod prelude {
    pub use super::control::prelude::*;
    pub use super::ids::{ClientTag, InputId, LightId, ParamId};
    pub use super::midi::prelude::*;
    pub use super::presets::prelude::*;
    pub use super::traits::prelude::*;
    pub use super::transport::MidiMessageTransport;
    pub use super::types::*;
    pub use super::util::prelude::*;
    pub use super::{StateError, TransportError};
}

mod error;
