// Copyright (c) 2023 Mike Tsao. All rights reserved.

use eagan_sync_core::prelude::*;

/// Builds the handful of [MidiMessage]s the device understands.
pub struct MidiUtils {}
impl MidiUtils {
    /// A plain control change.
    pub fn new_controller(controller: u7, value: u7) -> MidiMessage {
        MidiMessage::Controller { controller, value }
    }

    /// Opens a stream frame.
    pub fn new_stream_begin(stream: StreamId) -> MidiMessage {
        Self::new_controller(u7::new(cc::STREAM), u7::new(stream.0))
    }

    /// One field of a stream frame. The device reads polyphonic aftertouch
    /// on its config channel as (field, value).
    pub fn new_stream_poke(poke: u7, value: u7) -> MidiMessage {
        MidiMessage::Aftertouch { key: poke, vel: value }
    }

    /// The two messages that load a preset: bank select, then program change.
    pub fn new_preset_select(preset: PresetId) -> [MidiMessage; 2] {
        [
            Self::new_controller(u7::new(cc::BANK_SELECT), u7::new(preset.page)),
            MidiMessage::ProgramChange {
                program: u7::new(preset.slot),
            },
        ]
    }
}

/// A [Transport] that encodes each call as MIDI messages and hands them to a
/// sink, one at a time, along with the channel they belong on.
///
/// It's ready unless the host has marked the device busy, which it should do
/// while the device is loading a preset or otherwise not listening.
pub struct MidiMessageTransport<F> {
    sink: F,
    busy: bool,
}
impl<F> MidiMessageTransport<F>
where
    F: FnMut(MidiChannel, MidiMessage) -> Result<(), TransportError>,
{
    #[allow(missing_docs)]
    pub fn new_with(sink: F) -> Self {
        Self { sink, busy: false }
    }

    #[allow(missing_docs)]
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    #[allow(missing_docs)]
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
impl<F> std::fmt::Debug for MidiMessageTransport<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiMessageTransport")
            .field("busy", &self.busy)
            .finish()
    }
}
impl<F> Transport for MidiMessageTransport<F>
where
    F: FnMut(MidiChannel, MidiMessage) -> Result<(), TransportError>,
{
    fn is_ready(&self) -> bool {
        !self.busy
    }

    fn control_change(
        &mut self,
        channel: MidiChannel,
        cc: u7,
        value: u7,
    ) -> Result<(), TransportError> {
        (self.sink)(channel, MidiUtils::new_controller(cc, value))
    }

    fn begin_stream(&mut self, tag: ClientTag, stream: StreamId) -> Result<(), TransportError> {
        log::trace!("[{tag}] begin stream {stream}");
        (self.sink)(MidiChannel::CONFIG, MidiUtils::new_stream_begin(stream))
    }

    fn stream_data(&mut self, _tag: ClientTag, poke: u7, value: u7) -> Result<(), TransportError> {
        (self.sink)(MidiChannel::CONFIG, MidiUtils::new_stream_poke(poke, value))
    }

    fn select_preset(&mut self, tag: ClientTag, preset: PresetId) -> Result<(), TransportError> {
        log::trace!("[{tag}] select preset {preset}");
        for message in MidiUtils::new_preset_select(preset) {
            (self.sink)(MidiChannel::CONFIG, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_become_messages() {
        let mut sent = Vec::default();
        let mut t = MidiMessageTransport::new_with(|channel, message| {
            sent.push((channel, message));
            Ok(())
        });
        assert!(t.is_ready());
        t.control_change(MidiChannel(3), u7::new(12), u7::new(99))
            .unwrap();
        t.begin_stream(ClientTag(0), StreamId(5)).unwrap();
        t.stream_data(ClientTag(0), u7::new(2), u7::new(64)).unwrap();
        t.select_preset(ClientTag(0), PresetId::new(31, 7)).unwrap();
        drop(t);

        assert_eq!(
            sent,
            vec![
                (
                    MidiChannel(3),
                    MidiMessage::Controller {
                        controller: u7::new(12),
                        value: u7::new(99)
                    }
                ),
                (
                    MidiChannel::CONFIG,
                    MidiMessage::Controller {
                        controller: u7::new(56),
                        value: u7::new(5)
                    }
                ),
                (
                    MidiChannel::CONFIG,
                    MidiMessage::Aftertouch {
                        key: u7::new(2),
                        vel: u7::new(64)
                    }
                ),
                (
                    MidiChannel::CONFIG,
                    MidiMessage::Controller {
                        controller: u7::new(0),
                        value: u7::new(31)
                    }
                ),
                (
                    MidiChannel::CONFIG,
                    MidiMessage::ProgramChange {
                        program: u7::new(7)
                    }
                ),
            ]
        );
    }

    #[test]
    fn busy_means_not_ready() {
        let mut t = MidiMessageTransport::new_with(|_, _| Ok(()));
        t.set_busy(true);
        assert!(t.is_busy());
        assert!(!t.is_ready());
        t.set_busy(false);
        assert!(t.is_ready());
    }

    #[test]
    fn sink_errors_propagate() {
        let mut calls = 0;
        let mut t = MidiMessageTransport::new_with(|_, _| {
            calls += 1;
            Err(TransportError::NotConnected)
        });
        assert!(matches!(
            t.select_preset(ClientTag(0), PresetId::new(0, 0)),
            Err(TransportError::NotConnected)
        ));
        drop(t);
        assert_eq!(calls, 1, "program change shouldn't follow a failed bank select");
    }
}
