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

//! Staking-inflation controller.
//!
//! A pure calculator run once per block. When an inflation cycle closes the
//! max and min inflation rates are cut by the reduction rate. The yearly rate
//! then drifts toward the bonded-ratio goal inside `[min, max]`, and the
//! block's mint is capped so supply never passes `max_supply`. Minting
//! itself is left to the asset keeper.

use crate::core::math::bp::FixedBP;
use crate::core::math::{self, Amount, Dec, MathError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Governance-owned inflation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationParams {
    /// Hard cap on the staking token supply.
    pub max_supply: Amount,
    /// Cycle length in seconds.
    pub inflation_cycle: i64,
    /// Cut applied to min and max inflation at every cycle change.
    pub inflation_reduction_rate: FixedBP,
}

/// Mint module parameters touched by the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintParams {
    /// Upper bound of the yearly inflation rate.
    pub inflation_max: Dec,
    /// Lower bound of the yearly inflation rate.
    pub inflation_min: Dec,
    /// Max yearly change of the inflation rate.
    pub inflation_rate_change: Dec,
    /// Target bonded ratio.
    pub goal_bonded: Dec,
    /// Expected blocks per year.
    pub blocks_per_year: u64,
}

impl Default for MintParams {
    fn default() -> Self {
        Self {
            inflation_max: Dec::percent(20),
            inflation_min: Dec::percent(7),
            inflation_rate_change: Dec::percent(13),
            goal_bonded: Dec::percent(67),
            blocks_per_year: 60 * 60 * 8766 / 5,
        }
    }
}

/// Running mint state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minter {
    /// Current yearly inflation rate.
    pub inflation: Dec,
    /// Current yearly provisions.
    pub annual_provisions: Dec,
}

/// Result of one block's calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockMint {
    /// Yearly inflation rate applied this block.
    pub inflation: Dec,
    /// Tokens to mint this block.
    pub minted: Amount,
    /// True if a new inflation cycle began this block.
    pub cycle_changed: bool,
}

/// `2 * (max - min)`: lets the rate sweep the whole band within half a year.
fn fast_inflation_rate_change(p: &MintParams) -> Result<Dec, MathError> {
    let band = p
        .inflation_max
        .checked_sub(p.inflation_min)
        .map_err(|_| MathError::Underflow)?;
    band.checked_mul(Dec::from_atomics(2u128, 0).map_err(|_| MathError::Overflow)?)
        .map_err(|_| MathError::Overflow)
}

/// Next yearly rate: move toward the bonded goal by at most one block's share
/// of `inflation_rate_change`, then clamp into `[min, max]`.
pub fn next_inflation_rate(minter: &Minter, p: &MintParams, bonded_ratio: Dec) -> Result<Dec, MathError> {
    if p.goal_bonded.is_zero() || p.blocks_per_year == 0 {
        return Err(MathError::DivideByZero);
    }
    let ratio = bonded_ratio
        .checked_div(p.goal_bonded)
        .map_err(|_| MathError::Overflow)?;
    let blocks = Dec::from_atomics(p.blocks_per_year, 0).map_err(|_| MathError::Overflow)?;
    let per_block = |gap: Dec| -> Result<Dec, MathError> {
        gap.checked_mul(p.inflation_rate_change)
            .map_err(|_| MathError::Overflow)?
            .checked_div(blocks)
            .map_err(|_| MathError::Overflow)
    };

    let next = if ratio < Dec::one() {
        let step = per_block(Dec::one() - ratio)?;
        minter.inflation.checked_add(step).map_err(|_| MathError::Overflow)?
    } else {
        let step = per_block(ratio - Dec::one())?;
        minter.inflation.saturating_sub(step)
    };
    Ok(next.clamp(p.inflation_min, p.inflation_max))
}

/// Inflation controller bound to its parameters.
#[derive(Clone, Debug)]
pub struct Calculator {
    /// Parameters.
    pub params: InflationParams,
}

impl Calculator {
    /// New calculator.
    pub fn new(params: InflationParams) -> Self {
        Self { params }
    }

    /// Run one block at `now` (unix seconds) for a token `supply`.
    ///
    /// `mint` and `cycle_end` are updated in place when a cycle closes;
    /// `minter` receives the new rate and provisions.
    pub fn block_mint(
        &self,
        now: i64,
        supply: Amount,
        bonded_ratio: Dec,
        minter: &mut Minter,
        mint: &mut MintParams,
        cycle_end: &mut i64,
    ) -> Result<BlockMint, MathError> {
        if supply >= self.params.max_supply {
            minter.inflation = Dec::zero();
            minter.annual_provisions = Dec::zero();
            return Ok(BlockMint {
                inflation: Dec::zero(),
                minted: Amount::zero(),
                cycle_changed: false,
            });
        }

        let mut cycle_changed = false;
        if now > *cycle_end {
            let factor = self.params.inflation_reduction_rate.complement();
            mint.inflation_max = factor.mul_dec(mint.inflation_max)?;
            mint.inflation_min = factor.mul_dec(mint.inflation_min)?;
            mint.inflation_rate_change = fast_inflation_rate_change(mint)?;
            *cycle_end = now.saturating_add(self.params.inflation_cycle);
            cycle_changed = true;
            info!(inflation_max = %mint.inflation_max, inflation_min = %mint.inflation_min,
                inflation_cycle_end = *cycle_end, "inflation min and max rates updated");
        }

        minter.inflation = next_inflation_rate(minter, mint, bonded_ratio)?;
        let inflation = self.adjust_inflation(supply, minter, mint)?;
        minter.inflation = inflation;
        minter.annual_provisions = annual_provisions(inflation, supply)?;
        let minted = block_provision(minter, mint)?.min(self.gap(supply));
        Ok(BlockMint {
            inflation,
            minted,
            cycle_changed,
        })
    }

    fn gap(&self, supply: Amount) -> Amount {
        self.params.max_supply.saturating_sub(supply)
    }

    /// Rate that keeps this block's mint within `max_supply`. Returns the
    /// minter's rate unchanged when the cap is not reached.
    pub fn adjust_inflation(&self, supply: Amount, minter: &Minter, mint: &MintParams) -> Result<Dec, MathError> {
        let provisions = Minter {
            inflation: minter.inflation,
            annual_provisions: annual_provisions(minter.inflation, supply)?,
        };
        let block = block_provision(&provisions, mint)?;
        if math::add(supply, block)? <= self.params.max_supply {
            return Ok(minter.inflation);
        }
        if supply.is_zero() {
            return Err(MathError::DivideByZero);
        }
        let yearly = self
            .gap(supply)
            .checked_mul(Amount::from(mint.blocks_per_year))
            .map_err(|_| MathError::Overflow)?;
        math::dec_from_ratio(yearly, supply)
    }
}

/// `inflation * supply`.
fn annual_provisions(inflation: Dec, supply: Amount) -> Result<Dec, MathError> {
    let supply = Dec::from_atomics(supply, 0).map_err(|_| MathError::Overflow)?;
    inflation.checked_mul(supply).map_err(|_| MathError::Overflow)
}

/// `floor(annual_provisions / blocks_per_year)`.
fn block_provision(minter: &Minter, mint: &MintParams) -> Result<Amount, MathError> {
    if mint.blocks_per_year == 0 {
        return Err(MathError::DivideByZero);
    }
    Ok(math::dec_floor(minter.annual_provisions) / Amount::from(mint.blocks_per_year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn calc(max_supply: u64) -> Calculator {
        Calculator::new(InflationParams {
            max_supply: Amount::from(max_supply),
            inflation_cycle: 100,
            inflation_reduction_rate: FixedBP::new(2_500).unwrap(),
        })
    }

    fn one_block_year() -> MintParams {
        MintParams {
            blocks_per_year: 1,
            ..MintParams::default()
        }
    }

    #[test]
    fn adjust_keeps_rate_below_cap() {
        let m = Minter {
            inflation: Dec::percent(15),
            ..Minter::default()
        };
        let r = calc(2_000_000)
            .adjust_inflation(Amount::from(1_000_000u64), &m, &one_block_year())
            .unwrap();
        assert_eq!(r, Dec::percent(15));
    }

    #[test]
    fn adjust_lowers_rate_at_cap() {
        let m = Minter {
            inflation: Dec::from_str("7.1231").unwrap(),
            ..Minter::default()
        };
        let r = calc(2_000_000)
            .adjust_inflation(Amount::from(1_900_000u64), &m, &one_block_year())
            .unwrap();
        assert_eq!(r, Dec::from_str("0.052631578947368421").unwrap());
    }

    #[test]
    fn cycle_change_cuts_band() {
        let c = calc(u64::MAX);
        let mut mint = MintParams::default();
        let mut minter = Minter {
            inflation: Dec::percent(10),
            ..Minter::default()
        };
        let mut cycle_end = 50;
        let out = c
            .block_mint(60, Amount::from(1_000_000u64), Dec::percent(67), &mut minter, &mut mint, &mut cycle_end)
            .unwrap();
        assert!(out.cycle_changed);
        assert_eq!(cycle_end, 160);
        assert_eq!(mint.inflation_max, Dec::percent(15));
        assert_eq!(mint.inflation_min, Dec::from_str("0.0525").unwrap());
        assert_eq!(mint.inflation_rate_change, Dec::from_str("0.195").unwrap());
        assert!(out.inflation >= mint.inflation_min && out.inflation <= mint.inflation_max);
    }

    #[test]
    fn nothing_minted_at_max_supply() {
        let mut minter = Minter::default();
        let out = calc(1_000)
            .block_mint(1, Amount::from(1_000u64), Dec::zero(), &mut minter, &mut MintParams::default(), &mut 0)
            .unwrap();
        assert!(out.minted.is_zero());
        assert!(out.inflation.is_zero());
    }
}
