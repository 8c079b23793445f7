// Copyright (c) 2023 Mike Tsao. All rights reserved.

use super::{ControlPort, PortConfig, RateLimiter, SendOutcome};
use crate::{error::StateError, util::Rng};
use eagan_sync_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a [ModulationBus]'s ports live on the host. Port `i` reads its knob
/// from `first_param + i`, its CV from `first_input + i`, and shows whether
/// it's targeted on `first_light + i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModulationLayout {
    /// The single knob that edits whichever port is targeted.
    pub mod_param: ParamId,
    #[allow(missing_docs)]
    pub first_param: ParamId,
    #[allow(missing_docs)]
    pub first_input: InputId,
    #[allow(missing_docs)]
    pub first_light: LightId,
}

/// The persisted slice of a bus: one modulation amount per port.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ModulationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mod_amount: Option<Vec<f64>>,
}

/// A fixed bank of [ControlPort]s that share one "amount" knob.
///
/// Plugging a cable into a port's input makes that port the target, and the
/// amount knob then shows and edits that port's modulation depth. Outbound
/// values are pushed to the device no more often than the sync interval.
#[derive(Debug)]
pub struct ModulationBus {
    layout: ModulationLayout,
    tag: ClientTag,
    ports: Vec<ControlPort>,
    mod_target: Option<usize>,
    last_mod_target: Option<usize>,
    limiter: RateLimiter,
    rng: Rng,
}
impl ModulationBus {
    /// How often values go out unless the host says otherwise.
    pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(40);

    /// Builds one port per entry in `addressing`.
    pub fn configure(layout: ModulationLayout, addressing: &[PortConfig], tag: ClientTag) -> Self {
        Self::configure_with_rng(layout, addressing, tag, Rng::default())
    }

    /// Like [ModulationBus::configure()], with a caller-supplied source for
    /// the rate limiter's phase.
    pub fn configure_with_rng(
        layout: ModulationLayout,
        addressing: &[PortConfig],
        tag: ClientTag,
        mut rng: Rng,
    ) -> Self {
        let limiter = RateLimiter::new_with_phase(Self::DEFAULT_SYNC_INTERVAL, &mut rng);
        Self {
            layout,
            tag,
            ports: addressing
                .iter()
                .map(|config| ControlPort::new_with(*config))
                .collect(),
            mod_target: None,
            last_mod_target: None,
            limiter,
            rng,
        }
    }

    /// Reacts to a cable being plugged into or pulled from port
    /// `input_index`'s input.
    ///
    /// Connecting always retargets. Disconnecting the target zeroes its
    /// amount and hands the knob to the lowest-numbered port that's still
    /// connected, if any.
    pub fn on_port_change<H: ModuleHost + ?Sized>(
        &mut self,
        host: &mut H,
        input_index: usize,
        connecting: bool,
    ) {
        if input_index >= self.ports.len() {
            log::warn!(
                "[{}] ignoring change on input {input_index}; the bus has {} ports",
                self.tag,
                self.ports.len()
            );
            return;
        }
        if connecting {
            self.mod_target = Some(input_index);
            host.snap_param(self.layout.mod_param, self.ports[input_index].amount().value());
        } else if self.mod_target == Some(input_index) {
            self.ports[input_index].set_amount(Percentage::zero());

            // The host may still report the departing input as connected.
            let first_input = self.layout.first_input;
            let next = (0..self.ports.len())
                .filter(|&i| i != input_index)
                .find(|&i| host.is_input_connected(first_input + i));
            self.mod_target = next;
            let amount = next.map_or(Percentage::ZERO, |i| self.ports[i].amount().value());
            host.snap_param(self.layout.mod_param, amount);
        }
    }

    /// Points the amount knob at `target`, but only if its input is
    /// connected. Returns whether anything changed hands.
    pub fn set_modulation_target<H: ModuleHost + ?Sized>(
        &mut self,
        host: &mut H,
        target: usize,
    ) -> bool {
        if target >= self.ports.len() || !host.is_input_connected(self.layout.first_input + target)
        {
            return false;
        }
        self.mod_target = Some(target);
        host.snap_param(self.layout.mod_param, self.ports[target].amount().value());
        true
    }

    /// Copies the amount knob into the targeted port.
    pub fn pull_mod_amount<H: ModuleHost + ?Sized>(&mut self, host: &H) {
        if let Some(target) = self.mod_target {
            let amount = Percentage::new(host.param(self.layout.mod_param));
            self.ports[target].set_amount(amount);
        }
    }

    /// Refreshes every port from the host and sends the ones that changed.
    /// Returns how many went out.
    pub fn sync_send<H: ModuleHost + ?Sized, T: Transport + ?Sized>(
        &mut self,
        host: &H,
        transport: &mut T,
    ) -> usize {
        let mut sent = 0;
        for (i, port) in self.ports.iter_mut().enumerate() {
            port.pull_param_cv(
                host.param(self.layout.first_param + i),
                host.input_voltage(self.layout.first_input + i),
            );
            match port.send(transport, self.tag, false) {
                Ok(SendOutcome::Sent) => sent += 1,
                Ok(_) => {}
                Err(e) => log::warn!("[{}] port {i} will retry: {e}", self.tag),
            }
        }
        sent
    }

    /// Lights the targeted port and darkens the rest, but only when the
    /// target has changed since the last call.
    pub fn update_lights<H: ModuleHost + ?Sized>(&mut self, host: &mut H) {
        if self.mod_target == self.last_mod_target {
            return;
        }
        self.last_mod_target = self.mod_target;
        for i in 0..self.ports.len() {
            let brightness = if self.mod_target == Some(i) {
                Normal::maximum()
            } else {
                Normal::zero()
            };
            host.set_light(self.layout.first_light + i, brightness, LightTransition::Smooth);
        }
    }

    /// One host tick.
    pub fn process<H: ModuleHost + ?Sized, T: Transport + ?Sized>(
        &mut self,
        host: &mut H,
        transport: &mut T,
        delta: Duration,
    ) -> bool {
        self.pull_mod_amount(host);
        let synced = self.limiter.tick(delta);
        if synced {
            self.sync_send(host, transport);
        }
        self.update_lights(host);
        synced
    }

    /// Makes every port send on the next sync, changed or not.
    pub fn force_resync(&mut self) {
        self.ports
            .iter_mut()
            .for_each(|p| p.force_send_at_next_opportunity());
    }

    /// Restarts the rate limiter with a new period and a fresh phase.
    pub fn set_sync_interval(&mut self, interval: Duration) {
        self.limiter = RateLimiter::new_with_phase(interval, &mut self.rng);
    }

    #[allow(missing_docs)]
    pub fn sync_interval(&self) -> Duration {
        self.limiter.interval()
    }

    /// `{"mod-amount": [...]}`, one entry per port.
    pub fn mod_to_json(&self) -> Result<serde_json::Value, StateError> {
        let state = ModulationState {
            mod_amount: Some(self.ports.iter().map(|p| p.amount().value()).collect()),
        };
        Ok(serde_json::to_value(state)?)
    }

    /// Restores amounts saved by [ModulationBus::mod_to_json()]. Extra
    /// entries are ignored and missing ones leave their ports alone.
    pub fn mod_from_json(&mut self, value: &serde_json::Value) -> Result<(), StateError> {
        let state = ModulationState::deserialize(value)?;
        if let Some(amounts) = state.mod_amount {
            self.ports
                .iter_mut()
                .zip(amounts)
                .for_each(|(port, amount)| port.set_amount(Percentage::new(amount)));
        }
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn mod_target(&self) -> Option<usize> {
        self.mod_target
    }

    #[allow(missing_docs)]
    pub fn layout(&self) -> &ModulationLayout {
        &self.layout
    }

    #[allow(missing_docs)]
    pub fn tag(&self) -> ClientTag {
        self.tag
    }

    #[allow(missing_docs)]
    pub fn ports(&self) -> &[ControlPort] {
        &self.ports
    }

    #[allow(missing_docs)]
    pub fn port(&self, index: usize) -> Option<&ControlPort> {
        self.ports.get(index)
    }

    #[allow(missing_docs)]
    pub fn port_mut(&mut self, index: usize) -> Option<&mut ControlPort> {
        self.ports.get_mut(index)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
