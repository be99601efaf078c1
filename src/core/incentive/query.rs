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

//! Read-only queries.

use crate::core::incentive::bond::{bond_summary, BondSummary};
use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keepers::{CollateralKeeper, PriceMode, ValueOracle};
use crate::core::incentive::reward;
use crate::core::incentive::store;
use crate::core::incentive::types::{IncentiveProgram, Params, ProgramStatus};
use crate::core::math::{Amount, Dec, MathError};
use crate::core::state::batch::KvRead;
use crate::core::types::{validate_utoken_denom, Address, Coin, Coins};
use serde::Serialize;
use std::collections::BTreeSet;

/// A program with its current status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgramView {
    /// Program.
    pub program: IncentiveProgram,
    /// Status partition.
    pub status: ProgramStatus,
}

/// Reference APY of a uToken denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentRates {
    /// `10^exponent` units of the uToken.
    pub reference_bond: Coin,
    /// Yearly rewards paid to the reference bond at current totals.
    pub rewards: Coins,
}

/// USD-valued APY of a uToken denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActualRates {
    /// Yearly reward value over reference bond value.
    pub apy: Dec,
}

/// Read-only view over committed (or batched) incentive state.
pub struct Querier<'a, S: KvRead + ?Sized> {
    store: &'a S,
    collateral: &'a dyn CollateralKeeper,
    oracle: &'a dyn ValueOracle,
}

impl<'a, S: KvRead + ?Sized> Querier<'a, S> {
    /// Borrow a store and the read-side collaborators.
    pub fn new(store: &'a S, collateral: &'a dyn CollateralKeeper, oracle: &'a dyn ValueOracle) -> Self {
        Self {
            store,
            collateral,
            oracle,
        }
    }

    /// Module parameters.
    pub fn params(&self) -> Result<Params, IncentiveError> {
        store::get_params(self.store)
    }

    /// One program by id.
    pub fn program(&self, id: u32) -> Result<ProgramView, IncentiveError> {
        if id == 0 {
            return Err(IncentiveError::InvalidProgramID("program id 0".into()));
        }
        let (program, status) = store::get_program(self.store, id)?
            .ok_or_else(|| IncentiveError::NotFound(format!("incentive program {id}")))?;
        Ok(ProgramView { program, status })
    }

    /// All programs with `status`, ascending by id.
    pub fn programs(&self, status: ProgramStatus) -> Result<Vec<IncentiveProgram>, IncentiveError> {
        store::get_programs(self.store, status)
    }

    /// Total bonded for one denom, or for all denoms.
    pub fn total_bonded(&self, denom: Option<&str>) -> Result<Coins, IncentiveError> {
        match denom {
            Some(d) => {
                validate_utoken_denom(d)?;
                Ok(Coins::from_coin(Coin::new(d, store::get_total_bonded(self.store, d)?)))
            }
            None => store::get_all_total_bonded(self.store),
        }
    }

    /// Total unbonding for one denom, or for all denoms.
    pub fn total_unbonding(&self, denom: Option<&str>) -> Result<Coins, IncentiveError> {
        match denom {
            Some(d) => {
                validate_utoken_denom(d)?;
                Ok(Coins::from_coin(Coin::new(d, store::get_total_unbonding(self.store, d)?)))
            }
            None => store::get_all_total_unbonding(self.store),
        }
    }

    /// Rewards `addr` would receive if it claimed now.
    pub fn pending_rewards(&self, addr: &Address) -> Result<Coins, IncentiveError> {
        reward::calculate_rewards(self.store, addr)
    }

    /// Bond summaries for every denom `addr` has bonded or is unbonding.
    pub fn account_bonds(&self, addr: &Address) -> Result<Vec<BondSummary>, IncentiveError> {
        let mut denoms: BTreeSet<String> = store::get_account_bonds(self.store, addr)?
            .into_iter()
            .map(|c| c.denom)
            .collect();
        denoms.extend(store::get_unbonding_denoms(self.store, addr)?);
        denoms
            .iter()
            .map(|d| bond_summary(self.store, addr, d))
            .collect()
    }

    /// Reference APY of `denom`.
    pub fn current_rates(&self, denom: &str) -> Result<CurrentRates, IncentiveError> {
        validate_utoken_denom(denom)?;
        let (reference_bond, rewards) = reward::current_rates(self.store, denom)?;
        Ok(CurrentRates {
            reference_bond,
            rewards,
        })
    }

    /// USD APY of `denom`: spot value of the yearly rewards over spot value of
    /// the reference bond's underlying tokens.
    pub fn actual_rates(&self, denom: &str) -> Result<ActualRates, IncentiveError> {
        let rates = self.current_rates(denom)?;
        if rates.rewards.is_empty() {
            return Ok(ActualRates { apy: Dec::zero() });
        }
        let base = self.collateral.to_base_token(&rates.reference_bond)?;
        let bond_value = self
            .oracle
            .total_token_value(&Coins::from_coin(base), PriceMode::Spot)?;
        let reward_value = self.oracle.total_token_value(&rates.rewards, PriceMode::Spot)?;
        if bond_value.is_zero() {
            return Err(MathError::DivideByZero.into());
        }
        let apy = reward_value
            .checked_div(bond_value)
            .map_err(|_| MathError::Overflow)?;
        Ok(ActualRates { apy })
    }

    /// Unix seconds of the last reward distribution.
    pub fn last_reward_time(&self) -> Result<i64, IncentiveError> {
        store::get_last_rewards_time(self.store)
    }

    /// Collateral of `addr` the collateral keeper must keep locked.
    pub fn restricted_collateral(&self, addr: &Address, denom: &str) -> Result<Amount, IncentiveError> {
        validate_utoken_denom(denom)?;
        Ok(crate::core::incentive::bond::restricted_collateral(self.store, addr, denom)?.amount)
    }
}
