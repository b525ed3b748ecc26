//! Basis points: percentages and fee rates in units of 1/10 000.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// 100 % expressed in basis points.
pub const BASIS_POINT: u32 = 10_000;

/// A share expressed in basis points, always within `0..=10_000`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BasisPoints(u32);

impl BasisPoints {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(BASIS_POINT);

    /// Create a basis-point value, rejecting anything above 100 %.
    pub fn new(raw: u32) -> Result<Self, TypesError> {
        if raw > BASIS_POINT {
            return Err(TypesError::BasisPointsOutOfRange(raw));
        }
        Ok(Self(raw))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `floor(value * self / 10_000)`, or `None` on overflow.
    pub fn apply_floor(&self, value: u128) -> Option<u128> {
        value
            .checked_mul(self.0 as u128)
            .map(|p| p / BASIS_POINT as u128)
    }

    /// `ceil(value * self / 10_000)`, or `None` on overflow.
    pub fn apply_ceil(&self, value: u128) -> Option<u128> {
        value
            .checked_mul(self.0 as u128)
            .map(|p| p.div_ceil(BASIS_POINT as u128))
    }
}

impl TryFrom<u32> for BasisPoints {
    type Error = TypesError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BasisPoints> for u32 {
    fn from(bps: BasisPoints) -> u32 {
        bps.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
