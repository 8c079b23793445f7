// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::midi::u7;
use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use strum_macros::Display as StrumDisplay;

pub mod prelude {
    pub use super::{Normal, Percentage, RangedF64, ValueDomain, U14};
}

/// An f64 that is clamped to `LOWER..=UPPER` whenever it's constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;
    pub const ZERO: f64 = 0.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn zero() -> Self {
        Self(Self::ZERO)
    }
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A Normal is a [RangedF64] whose range is [0.0, 1.0]. Indicator brightness
/// is expressed as a Normal.
pub type Normal = RangedF64<0, 1>;
impl Default for Normal {
    fn default() -> Self {
        Self(0.0)
    }
}

/// A modulation depth, from -100% to 100%.
pub type Percentage = RangedF64<-100, 100>;
#[allow(missing_docs)]
impl Percentage {
    pub fn as_ratio(&self) -> f64 {
        self.0 / 100.0
    }
}
impl Default for Percentage {
    fn default() -> Self {
        Self(0.0)
    }
}

/// A 14-bit unsigned value, the native resolution of the device's
/// parameters. On the wire it travels as a coarse (top 7 bits) and an optional
/// fine (low 7 bits) half.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    DeriveDisplay,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
pub struct U14(u16);
#[allow(missing_docs)]
impl U14 {
    pub const MAX_VALUE: u16 = 0x3fff;
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(Self::MAX_VALUE);
    /// Where a bipolar value of zero lands.
    pub const CENTER: Self = Self(0x2000);

    /// Values above [U14::MAX_VALUE] saturate.
    pub const fn new(value: u16) -> Self {
        if value > Self::MAX_VALUE {
            Self(Self::MAX_VALUE)
        } else {
            Self(value)
        }
    }

    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The top 7 bits.
    pub fn coarse(&self) -> u7 {
        u7::new((self.0 >> 7) as u8)
    }

    /// The low 7 bits.
    pub fn fine(&self) -> u7 {
        u7::new((self.0 & 0x7f) as u8)
    }

    pub fn from_coarse_fine(coarse: u7, fine: u7) -> Self {
        Self(((coarse.as_int() as u16) << 7) | fine.as_int() as u16)
    }
}
impl From<U14> for u16 {
    fn from(value: U14) -> Self {
        value.0
    }
}
impl From<u16> for U14 {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

/// The UI-side coordinate system of a parameter. Knobs and CV inputs speak in
/// volts; [ValueDomain] maps them linearly onto the device's [U14] range.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, StrumDisplay, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ValueDomain {
    /// 0..=10
    #[default]
    Unipolar,
    /// -5..=5, with 0.0 landing on [U14::CENTER].
    Bipolar,
}
impl ValueDomain {
    /// The inclusive UI range.
    pub const fn range(&self) -> RangeInclusive<f64> {
        match self {
            ValueDomain::Unipolar => 0.0..=10.0,
            ValueDomain::Bipolar => -5.0..=5.0,
        }
    }

    /// Clamps a UI value into this domain.
    pub fn clamp(&self, value: f64) -> f64 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }

    /// Rescales a UI value onto the hardware range, rounding to the nearest
    /// integer.
    pub fn to_u14(&self, value: f64) -> U14 {
        let range = self.range();
        let normalized = (self.clamp(value) - range.start()) / (range.end() - range.start());
        U14::new((normalized * U14::MAX_VALUE as f64).round() as u16)
    }

    /// The inverse of [ValueDomain::to_u14()].
    pub fn from_u14(&self, value: U14) -> f64 {
        let range = self.range();
        range.start() + (value.0 as f64 / U14::MAX_VALUE as f64) * (range.end() - range.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use more_asserts::{assert_ge, assert_le};

    #[test]
    fn ranged_values_clamp() {
        assert_eq!(Percentage::new(250.0).value(), 100.0);
        assert_eq!(Percentage::new(-250.0).value(), -100.0);
        assert_eq!(Percentage::new(33.0).as_ratio(), 0.33);
        assert_eq!(Percentage::default(), Percentage::zero());

        assert_eq!(
            Normal::default().value(),
            0.0,
            "a default Normal should be dark"
        );
        assert_eq!(Normal::new(1.5), Normal::maximum());
    }

    #[test]
    fn u14_halves() {
        let v = U14::new(0x1234);
        assert_eq!(v.coarse().as_int(), 0x24);
        assert_eq!(v.fine().as_int(), 0x34);
        assert_eq!(U14::from_coarse_fine(v.coarse(), v.fine()), v);

        assert_eq!(U14::new(u16::MAX), U14::MAX, "out-of-range values saturate");
        assert_eq!(U14::MAX.coarse().as_int(), 127);
        assert_eq!(U14::MAX.fine().as_int(), 127);
    }

    #[test]
    fn domain_endpoints() {
        assert_eq!(ValueDomain::Unipolar.to_u14(0.0), U14::MIN);
        assert_eq!(ValueDomain::Unipolar.to_u14(10.0), U14::MAX);
        assert_eq!(ValueDomain::Unipolar.to_u14(11.0), U14::MAX);
        assert_eq!(ValueDomain::Bipolar.to_u14(-5.0), U14::MIN);
        assert_eq!(ValueDomain::Bipolar.to_u14(5.0), U14::MAX);
        assert_eq!(
            ValueDomain::Bipolar.to_u14(0.0),
            U14::CENTER,
            "bipolar zero should land on the hardware center"
        );
        assert!(approx_eq!(
            f64,
            ValueDomain::Unipolar.from_u14(U14::MAX),
            10.0,
            ulps = 2
        ));
    }

    #[test]
    fn every_u14_survives_the_round_trip() {
        for domain in [ValueDomain::Unipolar, ValueDomain::Bipolar] {
            for raw in 0..=U14::MAX_VALUE {
                let v = U14::new(raw);
                let ui = domain.from_u14(v);
                assert_ge!(ui, *domain.range().start());
                assert_le!(ui, *domain.range().end());
                assert_eq!(domain.to_u14(ui), v, "{domain} lost {raw} on the way back");
            }
        }
    }
}
