// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Structs that hold configuration information about various parts of the
//! system. Intended to be serialized.

use crate::presets::ScanTimeouts;
use derivative::Derivative;
use eagan_sync_core::traits::HasSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Contains persistent timing settings for device synchronization.
#[derive(Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct SyncSettings {
    #[serde(default = "SyncSettings::default_sync_interval_ms")]
    #[derivative(Default(value = "Self::default_sync_interval_ms()"))]
    sync_interval_ms: u64,

    #[serde(default = "SyncSettings::default_start_timeout_ms")]
    #[derivative(Default(value = "Self::default_start_timeout_ms()"))]
    start_timeout_ms: u64,

    #[serde(default = "SyncSettings::default_response_timeout_ms")]
    #[derivative(Default(value = "Self::default_response_timeout_ms()"))]
    response_timeout_ms: u64,

    #[serde(default = "SyncSettings::default_settle_time_ms")]
    #[derivative(Default(value = "Self::default_settle_time_ms()"))]
    settle_time_ms: u64,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for SyncSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl SyncSettings {
    fn default_sync_interval_ms() -> u64 {
        40
    }
    fn default_start_timeout_ms() -> u64 {
        750
    }
    fn default_response_timeout_ms() -> u64 {
        2500
    }
    fn default_settle_time_ms() -> u64 {
        2000
    }

    /// How often a modulation bus pushes its values to the device.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_sync_interval(&mut self, interval: Duration) {
        let ms = interval.as_millis() as u64;
        if ms != self.sync_interval_ms {
            self.sync_interval_ms = ms;
            self.needs_save();
        }
    }

    /// The three deadlines that govern a preset scan.
    pub fn scan_timeouts(&self) -> ScanTimeouts {
        ScanTimeouts {
            start: Duration::from_millis(self.start_timeout_ms),
            response: Duration::from_millis(self.response_timeout_ms),
            settle: Duration::from_millis(self.settle_time_ms),
        }
    }

    /// Updates the fields and marks the struct eligible to save.
    pub fn set_scan_timeouts(&mut self, timeouts: ScanTimeouts) {
        let start = timeouts.start.as_millis() as u64;
        let response = timeouts.response.as_millis() as u64;
        let settle = timeouts.settle.as_millis() as u64;
        if (start, response, settle)
            != (
                self.start_timeout_ms,
                self.response_timeout_ms,
                self.settle_time_ms,
            )
        {
            self.start_timeout_ms = start;
            self.response_timeout_ms = response;
            self.settle_time_ms = settle;
            self.needs_save();
        }
    }
}
