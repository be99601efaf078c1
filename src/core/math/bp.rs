// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Basis points. `x` represents the fraction `x / 10_000`.
//!
//! Results must not be chained: compose `(integer * bp) / 10_000` against the
//! original operand instead of multiplying two basis-point values.

use super::{Amount, Dec, MathError};
use cosmwasm_std::{Decimal256, Uint256};
use serde::{Deserialize, Serialize};

/// Basis points in `[0, 10_000]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FixedBP(u32);

/// Basis points in `[0, u32::MAX]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BP(pub u32);

/// Rounding mode for [`BP::from_quo`] and [`FixedBP::from_quo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Round away from zero.
    Up,
    /// Round toward zero.
    Down,
}

/// `10_000` basis points.
pub const ONE: u32 = 10_000;

impl FixedBP {
    /// 100%.
    pub const ONE: FixedBP = FixedBP(ONE);
    /// 0%.
    pub const ZERO: FixedBP = FixedBP(0);

    /// Construct, rejecting values above 100%.
    pub fn new(v: u32) -> Result<Self, MathError> {
        if v > ONE {
            return Err(MathError::OutOfRange(format!("{v} bp > {ONE}")));
        }
        Ok(Self(v))
    }

    /// Raw basis points.
    pub fn get(self) -> u32 {
        self.0
    }

    /// `a / b` as basis points. `b` must be non-zero and `a <= b`.
    pub fn from_quo(a: Amount, b: Amount, rounding: Rounding) -> Result<Self, MathError> {
        if !b.is_zero() && a > b {
            return Err(MathError::OutOfRange(format!("{a} / {b} > 1")));
        }
        let q = quo_bp(a, b, rounding)?;
        // q <= ONE because a <= b
        let v = if q > Uint256::from(ONE) { ONE } else { low_u32(q) };
        Ok(Self(v))
    }

    /// `1 - self`.
    pub fn complement(self) -> Self {
        Self(ONE - self.0)
    }

    /// `self * d`, rounded toward zero at 18 digits.
    pub fn mul_dec(self, d: Dec) -> Result<Dec, MathError> {
        let atomics = d
            .atomics()
            .checked_multiply_ratio(self.0, ONE)
            .map_err(|_| MathError::Overflow)?;
        Ok(Decimal256::new(atomics))
    }

    /// `x * 10^-4`.
    pub fn to_dec(self) -> Dec {
        BP(self.0).to_dec()
    }
}

impl TryFrom<u32> for FixedBP {
    type Error = MathError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        FixedBP::new(v)
    }
}

impl From<FixedBP> for u32 {
    fn from(v: FixedBP) -> u32 {
        v.0
    }
}

impl From<FixedBP> for BP {
    fn from(v: FixedBP) -> BP {
        BP(v.0)
    }
}

impl BP {
    /// `a / b` as basis points. Fails if `b` is zero or the result does not
    /// fit in `u32`.
    pub fn from_quo(a: Amount, b: Amount, rounding: Rounding) -> Result<Self, MathError> {
        let q = quo_bp(a, b, rounding)?;
        if q > Uint256::from(u32::MAX) {
            return Err(MathError::OutOfRange(format!("{a} / {b} = {q} bp")));
        }
        Ok(Self(low_u32(q)))
    }

    /// `x * 10^-4`.
    pub fn to_dec(self) -> Dec {
        Decimal256::from_ratio(self.0, ONE)
    }
}

/// `floor(a * b / 10_000)`.
pub fn mul(a: Amount, b: impl Into<BP>) -> Result<Amount, MathError> {
    a.checked_multiply_ratio(b.into().0, ONE)
        .map_err(|_| MathError::Overflow)
}

/// Signed variant of [`mul`]: `a * b / 10_000` rounded toward zero.
pub fn mul_signed(a: i128, b: impl Into<BP>) -> Result<i128, MathError> {
    a.checked_mul(i128::from(b.into().0))
        .map(|p| p / i128::from(ONE))
        .ok_or(MathError::Overflow)
}

/// `a * 10_000 / b` with the requested rounding.
fn quo_bp(a: Amount, b: Amount, rounding: Rounding) -> Result<Uint256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivideByZero);
    }
    let scaled = a
        .checked_mul(Uint256::from(ONE))
        .map_err(|_| MathError::Overflow)?;
    let q = scaled.checked_div(b).map_err(|_| MathError::DivideByZero)?;
    let rem = scaled.checked_rem(b).map_err(|_| MathError::DivideByZero)?;
    if rounding == Rounding::Up && !rem.is_zero() {
        return q.checked_add(Uint256::one()).map_err(|_| MathError::Overflow);
    }
    Ok(q)
}

fn low_u32(v: Uint256) -> u32 {
    let bytes = v.to_be_bytes();
    u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]])
}
