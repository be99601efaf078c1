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

//! Bond ledger: bonded amounts, unbonding queues and module totals.
//!
//! Bonded amounts exclude unbonding amounts. Starting an unbonding moves the
//! amount out of the bond and into the account's unbonding queue, so the
//! collateral an account has locked is always `bonded + unbonding`.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::store;
use crate::core::incentive::types::Unbonding;
use crate::core::math::{self, Amount};
use crate::core::state::batch::{KvRead, KvStore};
use crate::core::types::{Address, Coin};
use serde::Serialize;

/// Effective bond state of one account in one uToken denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BondSummary {
    /// Bonded amount.
    pub bonded: Coin,
    /// Sum of active (not yet matured) unbondings.
    pub unbonding: Coin,
    /// Active unbondings, oldest first.
    pub unbondings: Vec<Unbonding>,
}

impl BondSummary {
    /// `bonded + unbonding`.
    pub fn locked(&self) -> Result<Amount, IncentiveError> {
        Ok(math::add(self.bonded.amount, self.unbonding.amount)?)
    }
}

/// Bond state as of the last reward time, with matured but not yet cleaned
/// unbondings left out. Never writes.
pub fn bond_summary<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<BondSummary, IncentiveError> {
    let now = store::get_last_rewards_time(s)?;
    let duration = store::get_params(s)?.unbonding_duration;
    let bonded = store::get_bonded(s, addr, denom)?;

    let mut unbonding = Amount::zero();
    let mut unbondings = Vec::new();
    for u in store::get_unbondings(s, addr, denom)? {
        if u.is_mature(now, duration) {
            continue;
        }
        unbonding = math::add(unbonding, u.u_token.amount)?;
        unbondings.push(u);
    }
    Ok(BondSummary {
        bonded: Coin::new(denom, bonded),
        unbonding: Coin::new(denom, unbonding),
        unbondings,
    })
}

/// Collateral the collateral keeper must treat as locked: `bonded + unbonding`.
pub fn restricted_collateral<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<Coin, IncentiveError> {
    let summary = bond_summary(s, addr, denom)?;
    Ok(Coin::new(denom, summary.locked()?))
}

fn sum_unbondings(list: &[Unbonding]) -> Result<Amount, IncentiveError> {
    list.iter()
        .try_fold(Amount::zero(), |acc, u| math::add(acc, u.u_token.amount))
        .map_err(IncentiveError::from)
}

impl<S: KvStore + ?Sized> Keeper<'_, S> {
    /// Add to a bond. A bond going from zero to positive starts tracking the
    /// current accumulator.
    pub(crate) fn increase_bond(&mut self, addr: &Address, u_token: &Coin) -> Result<(), IncentiveError> {
        let denom = u_token.denom.as_str();
        let bonded = store::get_bonded(&*self.store, addr, denom)?;
        if bonded.is_zero() {
            let acc = store::get_accumulator(&*self.store, denom)?;
            store::set_tracker(&mut *self.store, addr, denom, &acc.rewards)?;
        }
        store::set_bonded(&mut *self.store, addr, denom, math::add(bonded, u_token.amount)?)?;
        let total = store::get_total_bonded(&*self.store, denom)?;
        store::set_total_bonded(&mut *self.store, denom, math::add(total, u_token.amount)?)
    }

    /// Subtract from a bond. A bond reaching zero drops its tracker.
    pub(crate) fn decrease_bond(&mut self, addr: &Address, u_token: &Coin) -> Result<(), IncentiveError> {
        let denom = u_token.denom.as_str();
        let bonded = store::get_bonded(&*self.store, addr, denom)?;
        let left = bonded.checked_sub(u_token.amount).map_err(|_| {
            IncentiveError::Invariant(format!("bond of {addr} would go negative: {bonded} - {u_token}"))
        })?;
        if left.is_zero() {
            store::clear_tracker(&mut *self.store, addr, denom);
        }
        store::set_bonded(&mut *self.store, addr, denom, left)?;
        let total = store::get_total_bonded(&*self.store, denom)?;
        let total = total.checked_sub(u_token.amount).map_err(|_| {
            IncentiveError::Invariant(format!("total bonded {denom} would go negative"))
        })?;
        store::set_total_bonded(&mut *self.store, denom, total)
    }

    /// Replace the stored unbonding list and move the module total by the difference.
    pub(crate) fn set_unbondings(
        &mut self,
        addr: &Address,
        denom: &str,
        list: &[Unbonding],
    ) -> Result<(), IncentiveError> {
        let before = sum_unbondings(&store::get_unbondings(&*self.store, addr, denom)?)?;
        let after = sum_unbondings(list)?;
        let total = store::get_total_unbonding(&*self.store, denom)?;
        let total = if after >= before {
            math::add(total, after - before)?
        } else {
            total.checked_sub(before - after).map_err(|_| {
                IncentiveError::Invariant(format!("total unbonding {denom} would go negative"))
            })?
        };
        store::put_unbondings(&mut *self.store, addr, denom, list)?;
        store::set_total_unbonding(&mut *self.store, denom, total)
    }

    /// Move `u_token` from the bond into a new unbonding that matures after
    /// the unbonding duration. With a zero duration the amount leaves at once.
    pub(crate) fn add_unbonding(&mut self, addr: &Address, u_token: &Coin) -> Result<(), IncentiveError> {
        self.decrease_bond(addr, u_token)?;
        let duration = store::get_params(&*self.store)?.unbonding_duration;
        if duration == 0 {
            return Ok(());
        }
        let start = store::get_last_rewards_time(&*self.store)?;
        let mut list = store::get_unbondings(&*self.store, addr, &u_token.denom)?;
        list.push(Unbonding {
            start,
            end: start.saturating_add(duration),
            u_token: u_token.clone(),
        });
        self.set_unbondings(addr, &u_token.denom, &list)
    }

    /// Drop every matured unbonding of `addr`, across all denoms.
    pub(crate) fn finish_unbondings(&mut self, addr: &Address) -> Result<(), IncentiveError> {
        let now = store::get_last_rewards_time(&*self.store)?;
        let duration = store::get_params(&*self.store)?.unbonding_duration;
        for denom in store::get_unbonding_denoms(&*self.store, addr)? {
            let stored = store::get_unbondings(&*self.store, addr, &denom)?;
            let active: Vec<Unbonding> = stored
                .iter()
                .filter(|u| !u.is_mature(now, duration))
                .cloned()
                .collect();
            if active.len() != stored.len() {
                self.set_unbondings(addr, &denom, &active)?;
            }
        }
        Ok(())
    }

    /// Shrink `bonded + unbonding` of `new_total.denom` to at most `new_total`.
    /// The bond absorbs the cut first only when it alone covers `new_total`;
    /// otherwise unbondings are cut oldest first.
    pub(crate) fn reduce_bond_to(&mut self, addr: &Address, new_total: &Coin) -> Result<(), IncentiveError> {
        let denom = new_total.denom.as_str();
        let summary = bond_summary(&*self.store, addr, denom)?;
        let bonded = summary.bonded.amount;
        let locked = summary.locked()?;
        if locked <= new_total.amount {
            return Ok(());
        }

        if bonded >= new_total.amount {
            let cut = Coin::new(denom, bonded - new_total.amount);
            if !cut.is_zero() {
                self.decrease_bond(addr, &cut)?;
            }
            return self.set_unbondings(addr, denom, &[]);
        }

        let mut excess = locked - new_total.amount;
        let mut kept = Vec::with_capacity(summary.unbondings.len());
        for mut u in summary.unbondings {
            if excess.is_zero() {
                kept.push(u);
                continue;
            }
            if u.u_token.amount <= excess {
                excess -= u.u_token.amount;
            } else {
                u.u_token.amount -= excess;
                excess = Amount::zero();
                kept.push(u);
            }
        }
        self.set_unbondings(addr, denom, &kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::incentive::keepers::{MemoryBank, MemoryCollateral};
    use crate::core::incentive::types::Params;
    use crate::core::state::batch::MemoryKv;
    use crate::core::types::ADDRESS_LEN;

    const D: &str = "u/uumee";

    fn coin(n: u64) -> Coin {
        Coin::new(D, n)
    }

    fn alice() -> Address {
        Address::from_bytes([1u8; ADDRESS_LEN])
    }

    #[test]
    fn unbonding_moves_amount_out_of_bond() {
        let mut kv = MemoryKv::new();
        let (mut bank, mut col) = (MemoryBank::new(), MemoryCollateral::new());
        store::set_last_rewards_time(&mut kv, 1000).unwrap();
        let mut k = Keeper::new(&mut kv, &mut bank, &mut col);

        k.increase_bond(&alice(), &coin(100)).unwrap();
        k.add_unbonding(&alice(), &coin(30)).unwrap();
        k.add_unbonding(&alice(), &coin(20)).unwrap();

        let s = bond_summary(k.store(), &alice(), D).unwrap();
        assert_eq!(s.bonded.amount, Amount::from(50u64));
        assert_eq!(s.unbonding.amount, Amount::from(50u64));
        assert_eq!(s.unbondings.len(), 2);
        assert_eq!(s.unbondings[0].end, 1000 + Params::default().unbonding_duration);
        assert_eq!(store::get_total_bonded(k.store(), D).unwrap(), Amount::from(50u64));
        assert_eq!(store::get_total_unbonding(k.store(), D).unwrap(), Amount::from(50u64));
    }

    #[test]
    fn reduce_bond_to_cuts_unbondings_oldest_first() {
        let mut kv = MemoryKv::new();
        let (mut bank, mut col) = (MemoryBank::new(), MemoryCollateral::new());
        store::set_last_rewards_time(&mut kv, 10).unwrap();
        let mut k = Keeper::new(&mut kv, &mut bank, &mut col);

        k.increase_bond(&alice(), &coin(100)).unwrap();
        k.add_unbonding(&alice(), &coin(10)).unwrap();
        k.add_unbonding(&alice(), &coin(20)).unwrap();
        k.add_unbonding(&alice(), &coin(30)).unwrap();
        // bonded 40, unbonding 10 + 20 + 30

        k.reduce_bond_to(&alice(), &coin(85)).unwrap();
        let s = bond_summary(k.store(), &alice(), D).unwrap();
        assert_eq!(s.bonded.amount, Amount::from(40u64));
        let left: Vec<Amount> = s.unbondings.iter().map(|u| u.u_token.amount).collect();
        assert_eq!(left, vec![Amount::from(15u64), Amount::from(30u64)]);

        k.reduce_bond_to(&alice(), &coin(25)).unwrap();
        let s = bond_summary(k.store(), &alice(), D).unwrap();
        assert_eq!(s.bonded.amount, Amount::from(25u64));
        assert!(s.unbondings.is_empty());
        assert!(store::get_total_unbonding(k.store(), D).unwrap().is_zero());
        assert_eq!(store::get_total_bonded(k.store(), D).unwrap(), Amount::from(25u64));

        // already below target
        k.reduce_bond_to(&alice(), &coin(1000)).unwrap();
        assert_eq!(store::get_bonded(k.store(), &alice(), D).unwrap(), Amount::from(25u64));
    }

    #[test]
    fn decrease_past_zero_is_an_invariant_breach() {
        let mut kv = MemoryKv::new();
        let (mut bank, mut col) = (MemoryBank::new(), MemoryCollateral::new());
        let mut k = Keeper::new(&mut kv, &mut bank, &mut col);
        k.increase_bond(&alice(), &coin(5)).unwrap();
        assert!(matches!(
            k.decrease_bond(&alice(), &coin(6)),
            Err(IncentiveError::Invariant(_))
        ));
    }
}
