// Copyright (c) 2023 Mike Tsao. All rights reserved.

use super::MidiMessageTransport;
use eagan_sync_core::{midi::LiveEvent, prelude::*};
use midir::MidiOutputConnection;

/// Wraps an open system MIDI output in a [MidiMessageTransport].
pub fn midir_transport(
    mut connection: MidiOutputConnection,
) -> MidiMessageTransport<impl FnMut(MidiChannel, MidiMessage) -> Result<(), TransportError>> {
    let mut bytes = Vec::with_capacity(3);
    MidiMessageTransport::new_with(move |channel: MidiChannel, message: MidiMessage| {
        bytes.clear();
        LiveEvent::Midi {
            channel: channel.into(),
            message,
        }
        .write_std(&mut bytes)
        .map_err(|e| TransportError::Send(e.to_string()))?;
        connection
            .send(&bytes)
            .map_err(|e| TransportError::Send(e.to_string()))
    })
}
