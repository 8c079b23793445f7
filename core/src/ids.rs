// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Identifiers for the host-side surfaces a module exposes. Hosts number their
//! params, inputs, and lights from zero; a bank of N ports occupies N
//! consecutive ids starting at some first id.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Addresses a host parameter (a knob or slider).
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ParamId(pub usize);
impl Add<usize> for ParamId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

/// Addresses a host input jack.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct InputId(pub usize);
impl Add<usize> for InputId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

/// Addresses a host indicator light.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LightId(pub usize);
impl Add<usize> for LightId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

/// Identifies the module instance that originated outbound traffic. Transports
/// use it for tracing and to recognize their own echoes.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ClientTag(pub usize);
impl From<usize> for ClientTag {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
