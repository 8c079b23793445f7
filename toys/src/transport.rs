// Copyright (c) 2023 Mike Tsao. All rights reserved.

use eagan_sync_core::prelude::*;

/// One call that reached a [RecordingTransport].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireEvent {
    ControlChange {
        channel: MidiChannel,
        cc: u8,
        value: u8,
    },
    BeginStream {
        tag: ClientTag,
        stream: StreamId,
    },
    StreamData {
        tag: ClientTag,
        poke: u8,
        value: u8,
    },
    SelectPreset {
        tag: ClientTag,
        preset: PresetId,
    },
}

/// A [Transport] that remembers everything it was asked to send.
///
/// It starts out ready. Use [RecordingTransport::set_ready()] to play a busy
/// device and [RecordingTransport::set_failing()] to play a broken output.
/// Failed calls aren't recorded.
#[derive(Debug)]
pub struct RecordingTransport {
    events: Vec<WireEvent>,
    is_ready: bool,
    is_failing: bool,
}
impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            events: Default::default(),
            is_ready: true,
            is_failing: false,
        }
    }
}
impl RecordingTransport {
    pub fn events(&self) -> &[WireEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn set_ready(&mut self, is_ready: bool) {
        self.is_ready = is_ready;
    }

    pub fn set_failing(&mut self, is_failing: bool) {
        self.is_failing = is_failing;
    }

    /// Just the presets that were requested, in order.
    pub fn presets(&self) -> Vec<PresetId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WireEvent::SelectPreset { preset, .. } => Some(*preset),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, event: WireEvent) -> Result<(), TransportError> {
        if self.is_failing {
            return Err(TransportError::Send("output unplugged".to_string()));
        }
        self.events.push(event);
        Ok(())
    }
}
impl Transport for RecordingTransport {
    fn is_ready(&self) -> bool {
        self.is_ready
    }

    fn control_change(
        &mut self,
        channel: MidiChannel,
        cc: u7,
        value: u7,
    ) -> Result<(), TransportError> {
        self.record(WireEvent::ControlChange {
            channel,
            cc: cc.as_int(),
            value: value.as_int(),
        })
    }

    fn begin_stream(&mut self, tag: ClientTag, stream: StreamId) -> Result<(), TransportError> {
        self.record(WireEvent::BeginStream { tag, stream })
    }

    fn stream_data(&mut self, tag: ClientTag, poke: u7, value: u7) -> Result<(), TransportError> {
        self.record(WireEvent::StreamData {
            tag,
            poke: poke.as_int(),
            value: value.as_int(),
        })
    }

    fn select_preset(&mut self, tag: ClientTag, preset: PresetId) -> Result<(), TransportError> {
        self.record(WireEvent::SelectPreset { tag, preset })
    }
}
