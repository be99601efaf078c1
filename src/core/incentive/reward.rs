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

//! Reward engine.
//!
//! Each bonded uToken denom has one accumulator holding the rewards earned so
//! far by `10^exponent` bonded units. Each (account, denom) bond has a tracker
//! holding the accumulator value at its last settlement. An account is owed
//! `bonded * (accumulator - tracker) / 10^exponent`, rounded down.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::store;
use crate::core::incentive::types::ProgramStatus;
use crate::core::math::{self, Amount, Dec, DEC_PLACES};
use crate::core::state::batch::{KvRead, KvStore};
use crate::core::types::{Address, Coin, Coins};
use tracing::{debug, info};

/// Julian year in seconds.
pub const SECONDS_PER_YEAR: u64 = 31_557_600;

/// Rewards `addr` could claim right now for one bonded denom.
pub fn calculate_single_reward<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<Coins, IncentiveError> {
    let bonded = store::get_bonded(s, addr, denom)?;
    if bonded.is_zero() {
        return Ok(Coins::new());
    }
    let acc = store::get_accumulator(s, denom)?;
    let tracker = store::get_tracker(s, addr, denom)?;
    let delta = acc.rewards.checked_sub(&tracker).map_err(|_| {
        IncentiveError::Invariant(format!("tracker of {addr} exceeds accumulator for {denom}"))
    })?;

    let exponent = acc
        .exponent
        .checked_add(DEC_PLACES)
        .ok_or(math::MathError::Overflow)?;
    let scale = math::pow10(exponent)?;
    let mut out = Coins::new();
    for d in delta.iter() {
        let amount = math::mul_ratio_floor(bonded, d.amount.atomics(), scale)?;
        out.add(&Coin::new(d.denom, amount))?;
    }
    Ok(out)
}

/// Rewards `addr` could claim right now across all its bonds.
pub fn calculate_rewards<S: KvRead + ?Sized>(s: &S, addr: &Address) -> Result<Coins, IncentiveError> {
    let mut out = Coins::new();
    for bond in store::get_account_bonds(s, addr)? {
        out.add_all(&calculate_single_reward(s, addr, &bond.denom)?)?;
    }
    Ok(out)
}

/// Yearly rewards currently paid to one reference bond (`10^exponent` units)
/// of `denom` by all ongoing programs.
pub fn current_rates<S: KvRead + ?Sized>(
    s: &S,
    denom: &str,
) -> Result<(Coin, Coins), IncentiveError> {
    let acc = store::get_accumulator(s, denom)?;
    let reference = math::pow10(acc.exponent)?;
    let bonded = store::get_total_bonded(s, denom)?;
    let mut rewards = Coins::new();
    if bonded.is_zero() {
        return Ok((Coin::new(denom, reference), rewards));
    }

    let year_reference = Amount::from(SECONDS_PER_YEAR)
        .checked_mul(reference)
        .map_err(|_| math::MathError::Overflow)?;
    for p in store::get_programs(s, ProgramStatus::Ongoing)? {
        if p.u_token != denom {
            continue;
        }
        let duration_bonded = math::amount_from_i64(p.duration)?
            .checked_mul(bonded)
            .map_err(|_| math::MathError::Overflow)?;
        let yearly = math::mul_ratio_floor(p.total_rewards.amount, year_reference, duration_bonded)?;
        rewards.add(&Coin::new(p.total_rewards.denom.clone(), yearly))?;
    }
    Ok((Coin::new(denom, reference), rewards))
}

impl<S: KvStore + ?Sized> Keeper<'_, S> {
    /// Distribute rewards of every ongoing program over `(prev, now]` and
    /// record `now` as the last rewards time.
    pub(crate) fn update_rewards(&mut self, prev: i64, now: i64) -> Result<Coins, IncentiveError> {
        let mut distributed = Coins::new();
        let elapsed = now.saturating_sub(prev);
        if elapsed > 0 {
            for mut p in store::get_programs(&*self.store, ProgramStatus::Ongoing)? {
                let prev_remaining = p.end_time().saturating_sub(prev).max(1);
                let fraction = if elapsed >= prev_remaining {
                    Dec::one()
                } else {
                    math::dec_from_ratio(
                        math::amount_from_i64(elapsed)?,
                        math::amount_from_i64(prev_remaining)?,
                    )?
                };
                let this_block = math::mul_dec_floor(p.remaining_rewards.amount, fraction)?;

                let bonded = store::get_total_bonded(&*self.store, &p.u_token)?;
                if bonded.is_zero() {
                    continue;
                }
                let mut acc = store::get_accumulator(&*self.store, &p.u_token)?;
                let scaled = this_block
                    .checked_mul(math::pow10(acc.exponent)?)
                    .map_err(|_| math::MathError::Overflow)?;
                let increment = math::dec_from_ratio(scaled, bonded)?;
                if increment.is_zero() {
                    continue;
                }

                acc.rewards.add(&p.total_rewards.denom, increment)?;
                p.remaining_rewards.amount = math::sub(p.remaining_rewards.amount, this_block)?;
                store::set_program(&mut *self.store, &p, ProgramStatus::Ongoing)?;
                store::set_accumulator(&mut *self.store, &acc)?;
                distributed.add(&Coin::new(p.total_rewards.denom.clone(), this_block))?;
                debug!(program_id = p.id, u_denom = %p.u_token, amount = %this_block, "program rewards distributed");
            }
        }
        store::set_last_rewards_time(&mut *self.store, now)?;
        Ok(distributed)
    }

    /// Pay out every nonzero pending reward of `addr` and advance the matching trackers.
    pub(crate) fn claim_rewards(&mut self, addr: &Address) -> Result<Coins, IncentiveError> {
        let mut total = Coins::new();
        for bond in store::get_account_bonds(&*self.store, addr)? {
            let rewards = calculate_single_reward(&*self.store, addr, &bond.denom)?;
            if rewards.is_empty() {
                continue;
            }
            self.assets.transfer_to_account(addr, &rewards)?;
            let acc = store::get_accumulator(&*self.store, &bond.denom)?;
            store::set_tracker(&mut *self.store, addr, &bond.denom, &acc.rewards)?;
            total.add_all(&rewards)?;
        }
        Ok(total)
    }

    /// Settle `addr`: clean matured unbondings, then claim rewards.
    pub fn update_account(&mut self, addr: &Address) -> Result<Coins, IncentiveError> {
        self.finish_unbondings(addr)?;
        let claimed = self.claim_rewards(addr)?;
        if !claimed.is_empty() {
            info!(account = %addr, rewards = %claimed, "rewards claimed");
        }
        Ok(claimed)
    }
}
