// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Concrete [Transport](eagan_sync_core::traits::Transport)s.

pub use messages::{MidiMessageTransport, MidiUtils};
#[cfg(feature = "midir")]
pub use midir_output::midir_transport;

mod messages;
#[cfg(feature = "midir")]
mod midir_output;
