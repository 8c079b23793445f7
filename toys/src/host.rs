// Copyright (c) 2023 Mike Tsao. All rights reserved.

use eagan_sync_core::prelude::*;
use std::collections::HashMap;

/// A [ModuleHost] made of hash maps. Unset params read zero; an input is
/// connected once it's been given a voltage.
#[derive(Debug, Default)]
pub struct ToyHost {
    params: HashMap<ParamId, f64>,
    inputs: HashMap<InputId, f64>,
    lights: HashMap<LightId, (Normal, LightTransition)>,
    snaps: Vec<(ParamId, f64)>,
    light_updates: usize,
}
impl ToyHost {
    /// Turns a knob the way a user would, without recording a snap.
    pub fn set_param(&mut self, id: ParamId, value: f64) {
        self.params.insert(id, value);
    }

    pub fn connect(&mut self, id: InputId, voltage: f64) {
        self.inputs.insert(id, voltage);
    }

    pub fn disconnect(&mut self, id: InputId) {
        self.inputs.remove(&id);
    }

    /// Every [ModuleHost::snap_param()] so far, oldest first.
    pub fn snaps(&self) -> &[(ParamId, f64)] {
        &self.snaps
    }

    pub fn light(&self, id: LightId) -> Option<Normal> {
        self.lights.get(&id).map(|(brightness, _)| *brightness)
    }

    pub fn light_transition(&self, id: LightId) -> Option<LightTransition> {
        self.lights.get(&id).map(|(_, transition)| *transition)
    }

    /// How many times [ModuleHost::set_light()] has been called.
    pub fn light_updates(&self) -> usize {
        self.light_updates
    }
}
impl ModuleHost for ToyHost {
    fn param(&self, id: ParamId) -> f64 {
        self.params.get(&id).copied().unwrap_or_default()
    }

    fn snap_param(&mut self, id: ParamId, value: f64) {
        self.params.insert(id, value);
        self.snaps.push((id, value));
    }

    fn is_input_connected(&self, id: InputId) -> bool {
        self.inputs.contains_key(&id)
    }

    fn input_voltage(&self, id: InputId) -> f64 {
        self.inputs.get(&id).copied().unwrap_or_default()
    }

    fn set_light(&mut self, id: LightId, brightness: Normal, transition: LightTransition) {
        self.lights.insert(id, (brightness, transition));
        self.light_updates += 1;
    }
}
