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

//! Money math: unbounded amounts, 18-digit decimals and basis points.
//!
//! All products round toward zero. Products of an amount and a decimal are
//! computed with a single 512-bit `multiply_ratio` so that no intermediate
//! rounding is introduced.

pub mod bp;

use cosmwasm_std::{Decimal256, Uint256};
use thiserror::Error;

/// Non-negative token amount.
pub type Amount = Uint256;

/// Fixed-point decimal with 18 fractional digits.
pub type Dec = Decimal256;

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PLACES: u32 = 18;

/// Arithmetic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,
    #[error("arithmetic underflow")]
    Underflow,
    #[error("division by zero")]
    DivideByZero,
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

/// `10^exp` as an amount.
pub fn pow10(exp: u32) -> Result<Amount, MathError> {
    Uint256::from(10u8)
        .checked_pow(exp)
        .map_err(|_| MathError::Overflow)
}

/// Atomics of [`Dec::one`], i.e. `10^18`.
fn dec_fractional() -> Amount {
    Uint256::from(1_000_000_000_000_000_000u128)
}

/// `floor(a * d)`.
pub fn mul_dec_floor(a: Amount, d: Dec) -> Result<Amount, MathError> {
    a.checked_multiply_ratio(d.atomics(), dec_fractional())
        .map_err(|_| MathError::Overflow)
}

/// `floor(a * n / d)` with a full-width intermediate product.
pub fn mul_ratio_floor(a: Amount, n: Amount, d: Amount) -> Result<Amount, MathError> {
    if d.is_zero() {
        return Err(MathError::DivideByZero);
    }
    a.checked_multiply_ratio(n, d).map_err(|_| MathError::Overflow)
}

/// `n / d` as a decimal, truncated at 18 digits.
pub fn dec_from_ratio(n: Amount, d: Amount) -> Result<Dec, MathError> {
    if d.is_zero() {
        return Err(MathError::DivideByZero);
    }
    Decimal256::checked_from_ratio(n, d).map_err(|_| MathError::Overflow)
}

/// Integer part of a decimal.
pub fn dec_floor(d: Dec) -> Amount {
    d.atomics() / dec_fractional()
}

/// Checked addition of two amounts.
pub fn add(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_add(b).map_err(|_| MathError::Overflow)
}

/// Checked subtraction of two amounts.
pub fn sub(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_sub(b).map_err(|_| MathError::Underflow)
}

/// Amount from a signed seconds value; negative values are rejected.
pub fn amount_from_i64(v: i64) -> Result<Amount, MathError> {
    u64::try_from(v)
        .map(|u| Uint256::from(u))
        .map_err(|_| MathError::OutOfRange(v.to_string()))
}
