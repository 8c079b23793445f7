// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Catalogs the presets stored on the device by loading each one in turn.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        Advance, PageWindow, Poll, PresetEnumerator, PresetTab, ReadyScan, ScanState,
        ScanStatus, ScanTimeouts,
    };
}

pub use enumerator::{
    Advance, PageWindow, Poll, PresetEnumerator, PresetTab, ReadyScan, ScanState, ScanStatus,
    ScanTimeouts,
};

mod enumerator;
