// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Contains the traits that define the seams between this library and the
//! things it talks to: the MIDI output, the host module, and the clock.

use crate::{
    error::TransportError,
    ids::{ClientTag, InputId, LightId, ParamId},
    midi::{u7, MidiChannel, PresetId, StreamId},
    types::Normal,
};
use std::time::Instant;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{Clock, HasSettings, LightTransition, ModuleHost, Transport};
}

/// The outbound half of a connection to the device.
///
/// Every call is fire-and-forget. Callers check [Transport::is_ready()] first
/// and hold their values when it says no. The device's replies to a preset
/// request don't come back through this trait; whoever listens to the MIDI
/// input forwards them to the preset enumerator directly.
pub trait Transport {
    /// True when the device is connected and not busy.
    fn is_ready(&self) -> bool;

    /// A plain 7-bit control change.
    fn control_change(
        &mut self,
        channel: MidiChannel,
        cc: u7,
        value: u7,
    ) -> Result<(), TransportError>;

    /// Opens a stream frame. Subsequent [Transport::stream_data()] calls land
    /// in it.
    fn begin_stream(&mut self, tag: ClientTag, stream: StreamId) -> Result<(), TransportError>;

    /// Pokes one field of the currently open stream frame.
    fn stream_data(&mut self, tag: ClientTag, poke: u7, value: u7) -> Result<(), TransportError>;

    /// Asks the device to load a stored preset.
    fn select_preset(&mut self, tag: ClientTag, preset: PresetId) -> Result<(), TransportError>;
}

/// How an indicator light should reach its new brightness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightTransition {
    /// Fade toward the new value over a few frames.
    #[default]
    Smooth,
    /// Jump straight there.
    Immediate,
}

/// The parts of the owning host module that a modulation bus reads and
/// writes. Injected into each call rather than held, so the bus never
/// needs a back-reference to its owner.
pub trait ModuleHost {
    /// The current value of a parameter.
    fn param(&self, id: ParamId) -> f64;

    /// Sets a parameter's displayed value directly, bypassing whatever
    /// smoothing the host normally applies to user edits.
    fn snap_param(&mut self, id: ParamId, value: f64);

    /// Whether a cable is plugged into the input.
    fn is_input_connected(&self, id: InputId) -> bool;

    /// The input's voltage. Disconnected inputs read zero.
    fn input_voltage(&self, id: InputId) -> f64;

    /// Drives an indicator light.
    fn set_light(&mut self, id: LightId, brightness: Normal, transition: LightTransition);
}

/// A monotonic time source. Device acknowledgments don't line up with audio
/// blocks, so timeouts are measured against this rather than the sample clock.
pub trait Clock {
    #[allow(missing_docs)]
    fn now(&self) -> Instant;
}

/// Something that [HasSettings] has persistent state that it needs to know
/// whether to save.
pub trait HasSettings {
    /// Whether the current state is already on disk.
    fn has_been_saved(&self) -> bool;
    /// Marks the state as changed since the last save.
    fn needs_save(&mut self);
    /// Marks the state as saved.
    fn mark_clean(&mut self);
}
