// Copyright (c) 2023 Mike Tsao. All rights reserved.

use derive_builder::Builder;
use eagan_sync_core::prelude::*;

/// Where a [ControlPort]'s value goes on the wire. Fixed for the life of the
/// port.
///
/// The controller number and stream id are 7-bit data bytes. The builder
/// refuses anything larger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct PortConfig {
    channel: MidiChannel,
    /// The coarse controller number. For stream-addressed ports, the poke id.
    cc: u8,
    /// When set, the value travels inside a stream frame instead of as a CC.
    #[builder(setter(strip_option))]
    stream: Option<StreamId>,
    /// Never send the fine half.
    low_resolution: bool,
    /// Track the value but never transmit it.
    no_send: bool,
    domain: ValueDomain,
}
#[allow(missing_docs)]
impl PortConfig {
    /// Usable in `const` addressing tables. The domain defaults to unipolar;
    /// see [PortConfig::with_domain()].
    ///
    /// # Panics
    ///
    /// If `cc` or the stream id is above [MAX_DATA_BYTE]. In a `const` table
    /// that's a compile error.
    pub const fn new_with(
        channel: MidiChannel,
        cc: u8,
        stream: Option<StreamId>,
        low_resolution: bool,
        no_send: bool,
    ) -> Self {
        assert!(cc <= MAX_DATA_BYTE, "controller numbers are 7-bit");
        if let Some(stream) = stream {
            assert!(stream.0 <= MAX_DATA_BYTE, "stream ids are 7-bit");
        }
        Self {
            channel,
            cc,
            stream,
            low_resolution,
            no_send,
            domain: ValueDomain::Unipolar,
        }
    }

    pub const fn with_domain(mut self, domain: ValueDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    pub fn cc(&self) -> u8 {
        self.cc
    }

    pub fn stream(&self) -> Option<StreamId> {
        self.stream
    }

    pub fn low_resolution(&self) -> bool {
        self.low_resolution
    }

    pub fn no_send(&self) -> bool {
        self.no_send
    }

    pub fn domain(&self) -> ValueDomain {
        self.domain
    }
}
impl PortConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(cc) = self.cc {
            if cc > MAX_DATA_BYTE {
                return Err(format!("controller number {cc} doesn't fit in 7 bits"));
            }
        }
        if let Some(Some(stream)) = self.stream {
            if stream.0 > MAX_DATA_BYTE {
                return Err(format!("stream id {stream} doesn't fit in 7 bits"));
            }
        }
        Ok(())
    }
}

/// What [ControlPort::send()] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The port is configured never to send.
    Suppressed,
    /// Nothing changed since the last transmission.
    Clean,
    /// The device wasn't ready. The value is still pending.
    Deferred,
    /// The value went out and the port is clean.
    Sent,
}

/// One logical parameter, seen three ways: as the UI's knob and CV, as the
/// modulated aggregate of the two, and as the device's 14-bit value.
///
/// The port remembers the last hardware value it actually delivered.
/// [ControlPort::pending()] is true whenever the current hardware value
/// differs from it, and stays true until a send succeeds, so a value that
/// can't go out this tick goes out on a later one.
#[derive(Clone, Debug, Default)]
pub struct ControlPort {
    config: PortConfig,

    param_value: f64,
    cv: f64,
    mod_amount: Percentage,
    mod_value: f64,

    em_value: U14,
    // None means nothing has been delivered since construction or the last
    // forced resync.
    last_em_value: Option<U14>,
}
impl ControlPort {
    #[allow(missing_docs)]
    pub fn new_with(config: PortConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    /// The modulated value: the knob plus the CV scaled by the amount, clamped
    /// to the domain.
    pub fn modulated_value(domain: ValueDomain, param_value: f64, cv: f64, amount: Percentage) -> f64 {
        domain.clamp(param_value + cv * amount.as_ratio())
    }

    /// Takes this tick's knob and CV readings and re-derives the hardware
    /// value from them.
    pub fn pull_param_cv(&mut self, param_value: f64, cv: f64) {
        self.param_value = param_value;
        self.cv = cv;
        self.mod_value =
            Self::modulated_value(self.config.domain, param_value, cv, self.mod_amount);
        self.em_value = self.config.domain.to_u14(self.mod_value);
    }

    /// Accepts a value that came from the device. The device already has it,
    /// so the port is left clean.
    pub fn set_em_and_param(&mut self, value: U14) {
        self.em_value = value;
        self.last_em_value = Some(value);
        self.param_value = self.config.domain.from_u14(value);
    }

    #[allow(missing_docs)]
    pub fn pending(&self) -> bool {
        self.last_em_value != Some(self.em_value)
    }

    /// Marks the current hardware value as delivered.
    pub fn un_pend(&mut self) {
        self.last_em_value = Some(self.em_value);
    }

    /// Makes the next [ControlPort::send()] transmit even if the value hasn't
    /// changed. Used after the device reconnects.
    pub fn force_send_at_next_opportunity(&mut self) {
        self.last_em_value = None;
    }

    /// Transmits the hardware value if it's pending (or `force` is set) and
    /// the transport is ready.
    ///
    /// A CC-addressed port sends the fine half first, on [cc::FINE], when
    /// it's nonzero and the port isn't low-resolution; then it always sends
    /// the coarse half. A stream-addressed port opens its stream and pokes the
    /// coarse half.
    ///
    /// If the transport fails partway, the port stays pending and the whole
    /// value is sent again next time.
    pub fn send<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        tag: ClientTag,
        force: bool,
    ) -> Result<SendOutcome, TransportError> {
        if self.config.no_send {
            return Ok(SendOutcome::Suppressed);
        }
        if !force && !self.pending() {
            return Ok(SendOutcome::Clean);
        }
        if !transport.is_ready() {
            return Ok(SendOutcome::Deferred);
        }

        let controller = u7::new(self.config.cc);
        let coarse = self.em_value.coarse();
        if let Some(stream) = self.config.stream {
            transport.begin_stream(tag, stream)?;
            transport.stream_data(tag, controller, coarse)?;
        } else {
            let fine = self.em_value.fine();
            if !self.config.low_resolution && fine.as_int() != 0 {
                transport.control_change(self.config.channel, u7::new(cc::FINE), fine)?;
            }
            transport.control_change(self.config.channel, controller, coarse)?;
        }
        log::trace!(
            "[{tag}] cc {} <- {} (channel {})",
            self.config.cc,
            self.em_value,
            self.config.channel
        );
        self.un_pend();
        Ok(SendOutcome::Sent)
    }

    /// The modulation depth applied to the CV.
    pub fn amount(&self) -> Percentage {
        self.mod_amount
    }

    #[allow(missing_docs)]
    pub fn set_amount(&mut self, amount: Percentage) {
        self.mod_amount = amount;
    }

    #[allow(missing_docs)]
    pub fn param_value(&self) -> f64 {
        self.param_value
    }

    #[allow(missing_docs)]
    pub fn cv(&self) -> f64 {
        self.cv
    }

    #[allow(missing_docs)]
    pub fn mod_value(&self) -> f64 {
        self.mod_value
    }

    #[allow(missing_docs)]
    pub fn em_value(&self) -> U14 {
        self.em_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagan_sync_toys::{RecordingTransport, WireEvent};
    use float_cmp::approx_eq;
    use more_asserts::{assert_ge, assert_le};

    const TAG: ClientTag = ClientTag(1);

    fn cc_port(cc: u8) -> ControlPort {
        ControlPort::new_with(
            PortConfigBuilder::default()
                .channel(MidiChannel(2))
                .cc(cc)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn fresh_port_is_pending() {
        let port = cc_port(12);
        assert!(
            port.pending(),
            "a port that has never sent anything should want to"
        );
    }

    #[test]
    fn second_send_is_a_no_op() {
        let mut transport = RecordingTransport::default();
        let mut port = cc_port(12);
        port.pull_param_cv(5.0, 0.0);
        assert_eq!(port.em_value(), U14::CENTER);

        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
        assert!(!port.pending());
        assert_eq!(port.send(&mut transport, TAG, false).unwrap(), SendOutcome::Clean);
        assert_eq!(
            transport.events(),
            &[WireEvent::ControlChange {
                channel: MidiChannel(2),
                cc: 12,
                value: 64
            }],
            "a value with no fine part should go out as exactly one CC"
        );
    }

    #[test]
    fn fine_half_precedes_coarse_half() {
        let mut transport = RecordingTransport::default();
        let mut port = cc_port(12);

        // 1.0 / 10.0 * 16383 = 1638.3, rounded to 1638 = 12 * 128 + 102
        port.pull_param_cv(1.0, 0.0);
        assert_eq!(port.em_value(), U14::new(1638));
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
        assert_eq!(
            transport.events(),
            &[
                WireEvent::ControlChange {
                    channel: MidiChannel(2),
                    cc: cc::FINE,
                    value: 102
                },
                WireEvent::ControlChange {
                    channel: MidiChannel(2),
                    cc: 12,
                    value: 12
                }
            ]
        );
    }

    #[test]
    fn low_resolution_ports_skip_the_fine_half() {
        let mut transport = RecordingTransport::default();
        let mut port = ControlPort::new_with(PortConfig::new_with(
            MidiChannel(0),
            7,
            None,
            true,
            false,
        ));
        port.pull_param_cv(1.0, 0.0);
        let _ = port.send(&mut transport, TAG, false);
        assert_eq!(
            transport.events(),
            &[WireEvent::ControlChange {
                channel: MidiChannel(0),
                cc: 7,
                value: 12
            }]
        );
    }

    #[test]
    fn stream_ports_poke_the_coarse_half() {
        let mut transport = RecordingTransport::default();
        let mut port = ControlPort::new_with(
            PortConfigBuilder::default()
                .cc(3)
                .stream(StreamId(9))
                .build()
                .unwrap(),
        );
        port.pull_param_cv(10.0, 0.0);
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
        assert_eq!(
            transport.events(),
            &[
                WireEvent::BeginStream {
                    tag: TAG,
                    stream: StreamId(9)
                },
                WireEvent::StreamData {
                    tag: TAG,
                    poke: 3,
                    value: 127
                }
            ]
        );
    }

    #[test]
    fn busy_device_defers_without_losing_the_value() {
        let mut transport = RecordingTransport::default();
        let mut port = cc_port(12);
        port.pull_param_cv(5.0, 0.0);

        transport.set_ready(false);
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Deferred
        );
        assert!(port.pending());
        assert!(transport.events().is_empty());

        transport.set_ready(true);
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
        assert_eq!(transport.events().len(), 1);
    }

    #[test]
    fn transport_failure_leaves_the_port_pending() {
        let mut transport = RecordingTransport::default();
        let mut port = cc_port(12);
        port.pull_param_cv(5.0, 0.0);

        transport.set_failing(true);
        assert!(port.send(&mut transport, TAG, false).is_err());
        assert!(port.pending());

        transport.set_failing(false);
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
    }

    #[test]
    fn no_send_ports_stay_quiet() {
        let mut transport = RecordingTransport::default();
        let mut port = ControlPort::new_with(
            PortConfigBuilder::default().cc(12).no_send(true).build().unwrap(),
        );
        port.pull_param_cv(3.0, 0.0);
        assert_eq!(
            port.send(&mut transport, TAG, true).unwrap(),
            SendOutcome::Suppressed
        );
        assert!(transport.events().is_empty());
    }

    #[test]
    fn forcing_resends_an_unchanged_value() {
        let mut transport = RecordingTransport::default();
        let mut port = cc_port(12);
        port.pull_param_cv(5.0, 0.0);
        let _ = port.send(&mut transport, TAG, false);
        assert!(!port.pending());

        assert_eq!(
            port.send(&mut transport, TAG, true).unwrap(),
            SendOutcome::Sent
        );
        port.force_send_at_next_opportunity();
        assert!(port.pending());
        assert_eq!(
            port.send(&mut transport, TAG, false).unwrap(),
            SendOutcome::Sent
        );
        assert_eq!(transport.events().len(), 3);
    }

    #[test]
    fn values_from_the_device_are_not_echoed() {
        let mut port = cc_port(12);
        port.set_em_and_param(U14::CENTER);
        assert!(!port.pending());
        assert_eq!(port.em_value(), U14::CENTER);
        assert!(approx_eq!(f64, port.param_value(), 5.0, epsilon = 0.001));

        port.pull_param_cv(port.param_value(), 0.0);
        assert!(
            !port.pending(),
            "re-pulling the value the device sent shouldn't make it pending"
        );
    }

    #[test]
    fn modulation_scales_cv_by_amount() {
        let mut port = cc_port(12);
        port.set_amount(Percentage::new(50.0));
        port.pull_param_cv(4.0, 2.0);
        assert!(approx_eq!(f64, port.mod_value(), 5.0, ulps = 2));
        assert_eq!(port.param_value(), 4.0);
        assert_eq!(port.cv(), 2.0);

        port.set_amount(Percentage::new(-100.0));
        port.pull_param_cv(4.0, 5.0);
        assert_eq!(port.mod_value(), 0.0, "should clamp at the bottom");
        assert_eq!(port.em_value(), U14::MIN);
    }

    #[test]
    fn modulated_value_never_leaves_the_domain() {
        for p in 0..=20 {
            for c in -10..=10 {
                for a in -10..=10 {
                    let v = ControlPort::modulated_value(
                        ValueDomain::Unipolar,
                        p as f64 * 0.5,
                        c as f64 * 0.5,
                        Percentage::new(a as f64 * 10.0),
                    );
                    assert_ge!(v, 0.0);
                    assert_le!(v, 10.0);
                }
            }
        }
    }

    #[test]
    fn bipolar_ports_center_on_zero() {
        let mut port = ControlPort::new_with(
            PortConfig::new_with(MidiChannel(0), 20, None, false, false)
                .with_domain(ValueDomain::Bipolar),
        );
        port.pull_param_cv(0.0, 0.0);
        assert_eq!(port.em_value(), U14::CENTER);
        port.pull_param_cv(-7.0, 0.0);
        assert_eq!(port.mod_value(), -5.0);
        assert_eq!(port.em_value(), U14::MIN);
    }

    #[test]
    fn builder_refuses_addresses_wider_than_seven_bits() {
        assert!(matches!(
            PortConfigBuilder::default().cc(128).build(),
            Err(PortConfigBuilderError::ValidationError(_))
        ));
        assert!(PortConfigBuilder::default()
            .stream(StreamId(200))
            .build()
            .is_err());

        let widest = PortConfigBuilder::default()
            .cc(MAX_DATA_BYTE)
            .stream(StreamId(MAX_DATA_BYTE))
            .build()
            .unwrap();
        assert_eq!(widest.cc(), 127);
        assert_eq!(widest.stream(), Some(StreamId(127)));
    }

    #[test]
    #[should_panic]
    fn const_addressing_refuses_wide_controller_numbers() {
        let _ = PortConfig::new_with(MidiChannel(0), 128, None, false, false);
    }

    #[test]
    #[should_panic]
    fn const_addressing_refuses_wide_stream_ids() {
        let _ = PortConfig::new_with(MidiChannel(0), 4, Some(StreamId(130)), false, false);
    }
}
