// Copyright (c) 2023 Mike Tsao. All rights reserved.

use thiserror::Error;

/// Failures reported by a [Transport](crate::traits::Transport). None of them
/// are fatal to the caller; a value that fails to go out stays pending and is
/// retried on a later tick.
#[derive(Debug, Error)]
pub enum TransportError {
    /// There is no open output to write to.
    #[error("the MIDI output is not connected")]
    NotConnected,
    /// The output rejected the bytes.
    #[error("failed to send MIDI message: {0}")]
    Send(String),
}
