// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The slice of MIDI that the device speaks: plain control changes, bank
//! select + program change for presets, and a framed "stream" extension for
//! values that have to land atomically.

pub use midly::live::LiveEvent;
pub use midly::{
    num::{u4, u7},
    MidiMessage,
};

use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{cc, u4, u7, MidiChannel, MidiMessage, PresetId, StreamId, MAX_DATA_BYTE};
}

/// Controller numbers with a fixed meaning on the device.
pub mod cc {
    /// Bank select. Carries the page byte of a [PresetId](super::PresetId).
    pub const BANK_SELECT: u8 = 0;
    /// Carries the low 7 bits of a 14-bit value. Must precede the coarse CC it
    /// refines.
    pub const FINE: u8 = 31;
    /// Opens a stream frame. The value names the stream.
    pub const STREAM: u8 = 56;
}

/// The largest value a MIDI data byte can hold. Controller numbers, stream
/// ids, and preset pages all travel as data bytes.
pub const MAX_DATA_BYTE: u8 = 0x7f;

/// Newtype for MIDI channel.
#[derive(
    Clone, Copy, Debug, Default, DeriveDisplay, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    /// The device listens for configuration, presets, and streams on the
    /// sixteenth channel.
    pub const CONFIG_VALUE: u8 = 15;
    pub const CONFIG: Self = Self(Self::CONFIG_VALUE);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<u8> for MidiChannel {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
impl From<MidiChannel> for u8 {
    fn from(value: MidiChannel) -> Self {
        value.0
    }
}
impl From<MidiChannel> for u4 {
    fn from(value: MidiChannel) -> Self {
        u4::new(value.0)
    }
}

/// Names one stream frame kind.
#[derive(
    Clone, Copy, Debug, Default, DeriveDisplay, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct StreamId(pub u8);

/// The address of one stored preset: a page byte (sent as bank select) and a
/// slot within that page (sent as a program change).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PresetId {
    /// Bank-select value, often called cc0.
    pub page: u8,
    /// Program number, 0..=127.
    pub slot: u8,
}
impl PresetId {
    /// Number of slots in every page.
    pub const SLOTS_PER_PAGE: usize = 128;
    /// The highest valid slot.
    pub const LAST_SLOT: u8 = 127;

    #[allow(missing_docs)]
    pub const fn new(page: u8, slot: u8) -> Self {
        Self { page, slot }
    }
}
impl std::fmt::Display for PresetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.page, self.slot)
    }
}
