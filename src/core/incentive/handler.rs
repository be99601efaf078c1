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

//! Message handlers.
//!
//! Every account message settles the account first (matured unbondings
//! cleaned, rewards claimed) so its checks read post-maturation state.

use crate::core::incentive::bond::bond_summary;
use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::msg::{Msg, MsgResponse};
use crate::core::incentive::store;
use crate::core::incentive::types::{IncentiveProgram, Params};
use crate::core::math;
use crate::core::state::batch::KvStore;
use crate::core::types::{validate_utoken_denom, Address, Coin, Coins};
use tracing::info;

impl<S: KvStore + ?Sized> Keeper<'_, S> {
    /// Validate and execute one message.
    pub fn handle(&mut self, msg: &Msg) -> Result<MsgResponse, IncentiveError> {
        msg.validate_basic()?;
        match msg {
            Msg::Bond { account, u_token } => {
                self.bond(account, u_token)?;
                Ok(MsgResponse::Bond)
            }
            Msg::BeginUnbonding { account, u_token } => {
                self.begin_unbonding(account, u_token)?;
                Ok(MsgResponse::BeginUnbonding)
            }
            Msg::EmergencyUnbond { account, u_token } => {
                let fee = self.emergency_unbond(account, u_token)?;
                Ok(MsgResponse::EmergencyUnbond { fee })
            }
            Msg::Claim { account } => Ok(MsgResponse::Claim {
                amount: self.claim(account)?,
            }),
            Msg::Sponsor {
                sponsor,
                program,
                asset,
            } => {
                self.sponsor_program(sponsor, *program, asset)?;
                Ok(MsgResponse::Sponsor)
            }
            Msg::GovCreatePrograms {
                programs,
                from_community_fund,
            } => Ok(MsgResponse::GovCreatePrograms {
                ids: self.gov_create_programs(programs, *from_community_fund)?,
            }),
            Msg::GovSetParams { params } => {
                self.gov_set_params(params)?;
                Ok(MsgResponse::GovSetParams)
            }
        }
    }

    /// Bond `u_token`. Collateral must cover everything already locked plus the new bond.
    pub fn bond(&mut self, addr: &Address, u_token: &Coin) -> Result<(), IncentiveError> {
        self.update_account(addr)?;
        let collateral = self.collateral.collateral(addr, &u_token.denom);
        let summary = bond_summary(&*self.store, addr, &u_token.denom)?;
        let locked = summary.locked()?;
        if collateral.amount < math::add(locked, u_token.amount)? {
            return Err(IncentiveError::InsufficientCollateral {
                collateral: collateral.to_string(),
                bonded: Coin::new(u_token.denom.clone(), locked).to_string(),
                requested: u_token.to_string(),
            });
        }
        self.increase_bond(addr, u_token)
    }

    /// Begin unbonding `u_token` from the bond.
    pub fn begin_unbonding(&mut self, addr: &Address, u_token: &Coin) -> Result<(), IncentiveError> {
        self.update_account(addr)?;
        let max = store::get_params(&*self.store)?.max_unbondings;
        let summary = bond_summary(&*self.store, addr, &u_token.denom)?;
        if max > 0 && summary.unbondings.len() >= max as usize {
            return Err(IncentiveError::MaxUnbondings(max));
        }
        if u_token.amount > summary.bonded.amount {
            return Err(IncentiveError::InsufficientBonded {
                available: summary.bonded.to_string(),
                requested: u_token.to_string(),
            });
        }
        self.add_unbonding(addr, u_token)
    }

    /// Instantly release `u_token` from bonded and unbonding amounts, donating
    /// the emergency fee share of it to the collateral keeper. Returns the fee.
    pub fn emergency_unbond(&mut self, addr: &Address, u_token: &Coin) -> Result<Coin, IncentiveError> {
        self.update_account(addr)?;
        let summary = bond_summary(&*self.store, addr, &u_token.denom)?;
        let max = summary.locked()?;
        if u_token.amount > max {
            return Err(IncentiveError::InsufficientBonded {
                available: Coin::new(u_token.denom.clone(), max).to_string(),
                requested: u_token.to_string(),
            });
        }

        let fee_rate = store::get_params(&*self.store)?.emergency_unbond_fee;
        let fee = Coin::new(u_token.denom.clone(), math::mul_dec_floor(u_token.amount, fee_rate)?);
        self.collateral.donate(addr, &fee)?;

        let rest = Coin::new(u_token.denom.clone(), math::sub(max, u_token.amount)?);
        self.reduce_bond_to(addr, &rest)?;
        info!(account = %addr, u_denom = %u_token.denom, amount = %u_token.amount, fee = %fee.amount,
            "emergency unbond");
        Ok(fee)
    }

    /// Claim all pending rewards.
    pub fn claim(&mut self, addr: &Address) -> Result<Coins, IncentiveError> {
        self.update_account(addr)
    }

    /// Create every proposed program, or none if any is invalid.
    pub fn gov_create_programs(
        &mut self,
        programs: &[IncentiveProgram],
        from_community_fund: bool,
    ) -> Result<Vec<u32>, IncentiveError> {
        if programs.is_empty() {
            return Err(IncentiveError::EmptyProposal);
        }
        programs.iter().try_for_each(IncentiveProgram::validate_proposed)?;
        programs
            .iter()
            .map(|p| self.create_program(p, from_community_fund))
            .collect()
    }

    /// Replace module parameters.
    pub fn gov_set_params(&mut self, params: &Params) -> Result<(), IncentiveError> {
        params.validate()?;
        store::set_params(&mut *self.store, params)?;
        info!(max_unbondings = params.max_unbondings, unbonding_duration = params.unbonding_duration,
            emergency_unbond_fee = %params.emergency_unbond_fee, "incentive params updated");
        Ok(())
    }

    /// Liquidation hook: the collateral keeper reduced `addr`'s collateral to
    /// `new_collateral`, so its bonded and unbonding amounts must shrink to fit.
    pub fn force_unbond_to(&mut self, addr: &Address, new_collateral: &Coin) -> Result<(), IncentiveError> {
        validate_utoken_denom(&new_collateral.denom)?;
        self.update_account(addr)?;
        self.reduce_bond_to(addr, new_collateral)?;
        info!(account = %addr, collateral = %new_collateral, "bond reduced by collateral keeper");
        Ok(())
    }
}
