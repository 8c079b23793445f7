// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Stand-ins for the things eagan-sync talks to, so that its behavior can be
//! checked without a device, a host, or a real clock.

pub use clock::ManualClock;
pub use host::ToyHost;
pub use transport::{RecordingTransport, WireEvent};

mod clock;
mod host;
mod transport;
