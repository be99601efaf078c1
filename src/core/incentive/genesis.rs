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

//! Genesis import and export of the full incentive state.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::store;
use crate::core::incentive::types::{
    AccountUnbondings, Bond, IncentiveProgram, Params, ProgramStatus, RewardAccumulator,
    RewardTracker,
};
use crate::core::math::Amount;
use crate::core::state::batch::{KvRead, KvStore};
use crate::core::types::{Address, Coins};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Complete incentive state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Module parameters.
    pub params: Params,
    /// Completed programs, ascending by id.
    #[serde(default)]
    pub completed_programs: Vec<IncentiveProgram>,
    /// Ongoing programs, ascending by id.
    #[serde(default)]
    pub ongoing_programs: Vec<IncentiveProgram>,
    /// Upcoming programs, ascending by id.
    #[serde(default)]
    pub upcoming_programs: Vec<IncentiveProgram>,
    /// Id assigned to the next created program.
    pub next_program_id: u32,
    /// Unix seconds of the last reward distribution.
    pub last_rewards_time: i64,
    /// Bonded amounts.
    #[serde(default)]
    pub bonds: Vec<Bond>,
    /// Reward trackers.
    #[serde(default)]
    pub reward_trackers: Vec<RewardTracker>,
    /// Reward accumulators.
    #[serde(default)]
    pub reward_accumulators: Vec<RewardAccumulator>,
    /// Unbonding queues.
    #[serde(default)]
    pub account_unbondings: Vec<AccountUnbondings>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            completed_programs: Vec::new(),
            ongoing_programs: Vec::new(),
            upcoming_programs: Vec::new(),
            next_program_id: 1,
            last_rewards_time: 0,
            bonds: Vec::new(),
            reward_trackers: Vec::new(),
            reward_accumulators: Vec::new(),
            account_unbondings: Vec::new(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> IncentiveError {
    IncentiveError::InvalidGenesis(msg.into())
}

impl GenesisState {
    /// Programs with their status, in partition order.
    pub fn programs(&self) -> impl Iterator<Item = (&IncentiveProgram, ProgramStatus)> {
        self.upcoming_programs
            .iter()
            .map(|p| (p, ProgramStatus::Upcoming))
            .chain(self.ongoing_programs.iter().map(|p| (p, ProgramStatus::Ongoing)))
            .chain(self.completed_programs.iter().map(|p| (p, ProgramStatus::Completed)))
    }

    /// Full stateless validation.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        self.params.validate()?;
        if self.next_program_id == 0 {
            return Err(IncentiveError::InvalidProgramID("next program id must be at least 1".into()));
        }
        if self.last_rewards_time < 0 {
            return Err(invalid(format!("negative last rewards time {}", self.last_rewards_time)));
        }

        let mut ids = BTreeSet::new();
        for (p, status) in self.programs() {
            p.validate_passed()?;
            if !ids.insert(p.id) {
                return Err(IncentiveError::InvalidProgramID(format!("duplicate program id {}", p.id)));
            }
            if p.id >= self.next_program_id {
                return Err(IncentiveError::InvalidProgramID(format!(
                    "program id {} not below next program id {}",
                    p.id, self.next_program_id
                )));
            }
            if status == ProgramStatus::Ongoing && !p.funded {
                return Err(invalid(format!("ongoing program {} is not funded", p.id)));
            }
        }

        let mut bonded: BTreeMap<(Address, &str), Amount> = BTreeMap::new();
        for b in self.bonds.iter() {
            b.validate()?;
            if bonded.insert((b.account, b.u_token.denom.as_str()), b.u_token.amount).is_some() {
                return Err(invalid(format!("duplicate bond {} {}", b.account, b.u_token.denom)));
            }
        }

        let mut accumulators = BTreeMap::new();
        for a in self.reward_accumulators.iter() {
            a.validate()?;
            if accumulators.insert(a.u_token.as_str(), &a.rewards).is_some() {
                return Err(invalid(format!("duplicate accumulator {}", a.u_token)));
            }
        }

        let mut trackers = BTreeSet::new();
        for t in self.reward_trackers.iter() {
            t.validate()?;
            if !trackers.insert((t.account, t.u_token.as_str())) {
                return Err(invalid(format!("duplicate tracker {} {}", t.account, t.u_token)));
            }
            let has_bond = bonded
                .get(&(t.account, t.u_token.as_str()))
                .is_some_and(|a| !a.is_zero());
            if !has_bond {
                return Err(invalid(format!("tracker {} {} without a bond", t.account, t.u_token)));
            }
            let Some(acc) = accumulators.get(t.u_token.as_str()) else {
                return Err(invalid(format!("tracker {} {} without an accumulator", t.account, t.u_token)));
            };
            if acc.checked_sub(&t.rewards).is_err() {
                return Err(invalid(format!("tracker {} {} above its accumulator", t.account, t.u_token)));
            }
        }

        let mut groups = BTreeSet::new();
        for g in self.account_unbondings.iter() {
            g.validate()?;
            if !groups.insert((g.account, g.u_token.as_str())) {
                return Err(invalid(format!("duplicate unbondings {} {}", g.account, g.u_token)));
            }
        }
        Ok(())
    }
}

/// Write a validated genesis state into an empty store. Module totals are
/// derived from the bonds and unbondings.
pub fn init_genesis<S: KvStore + ?Sized>(s: &mut S, g: &GenesisState) -> Result<(), IncentiveError> {
    g.validate()?;
    store::set_params(s, &g.params)?;
    store::set_next_program_id(s, g.next_program_id)?;
    store::set_last_rewards_time(s, g.last_rewards_time)?;
    for (p, status) in g.programs() {
        store::set_program(s, p, status)?;
    }

    let mut total_bonded = Coins::new();
    for b in g.bonds.iter() {
        store::set_bonded(s, &b.account, &b.u_token.denom, b.u_token.amount)?;
        total_bonded.add(&b.u_token)?;
    }
    for t in g.reward_trackers.iter() {
        store::set_tracker(s, &t.account, &t.u_token, &t.rewards)?;
    }
    for a in g.reward_accumulators.iter() {
        store::set_accumulator(s, a)?;
    }

    let mut total_unbonding = Coins::new();
    for group in g.account_unbondings.iter() {
        store::put_unbondings(s, &group.account, &group.u_token, &group.unbondings)?;
        for u in group.unbondings.iter() {
            total_unbonding.add(&u.u_token)?;
        }
    }

    for c in total_bonded.iter() {
        store::set_total_bonded(s, &c.denom, c.amount)?;
    }
    for c in total_unbonding.iter() {
        store::set_total_unbonding(s, &c.denom, c.amount)?;
    }
    Ok(())
}

/// Read the full incentive state.
pub fn export_genesis<S: KvRead + ?Sized>(s: &S) -> Result<GenesisState, IncentiveError> {
    Ok(GenesisState {
        params: store::get_params(s)?,
        completed_programs: store::get_programs(s, ProgramStatus::Completed)?,
        ongoing_programs: store::get_programs(s, ProgramStatus::Ongoing)?,
        upcoming_programs: store::get_programs(s, ProgramStatus::Upcoming)?,
        next_program_id: store::get_next_program_id(s)?,
        last_rewards_time: store::get_last_rewards_time(s)?,
        bonds: store::get_all_bonds(s)?,
        reward_trackers: store::get_all_trackers(s)?,
        reward_accumulators: store::get_all_accumulators(s)?,
        account_unbondings: store::get_all_unbondings(s)?,
    })
}

/// Recompute module totals from bonds and unbondings and compare with the
/// stored totals. Returns the first mismatching denom as an invariant error.
pub fn check_totals<S: KvRead + ?Sized>(s: &S) -> Result<(), IncentiveError> {
    let mut bonded = Coins::new();
    for b in store::get_all_bonds(s)? {
        bonded.add(&b.u_token)?;
    }
    let mut unbonding = Coins::new();
    for g in store::get_all_unbondings(s)? {
        for u in g.unbondings.iter() {
            unbonding.add(&u.u_token)?;
        }
    }
    if bonded != store::get_all_total_bonded(s)? {
        return Err(IncentiveError::Invariant(format!("total bonded mismatch: bonds sum to {bonded}")));
    }
    if unbonding != store::get_all_total_unbonding(s)? {
        return Err(IncentiveError::Invariant(format!(
            "total unbonding mismatch: unbondings sum to {unbonding}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Dec;
    use crate::core::state::batch::MemoryKv;
    use crate::core::types::{Coin, DecCoins, ADDRESS_LEN};

    fn alice() -> Address {
        Address::from_bytes([1u8; ADDRESS_LEN])
    }

    fn program(id: u32) -> IncentiveProgram {
        let mut p = IncentiveProgram::proposed("u/uumee", 10, 10, Coin::new("uumee", 5u64));
        p.id = id;
        p
    }

    #[test]
    fn default_genesis_is_valid() {
        assert!(GenesisState::default().validate().is_ok());
    }

    #[test]
    fn duplicate_ids_across_partitions_rejected() {
        let g = GenesisState {
            upcoming_programs: vec![program(1)],
            completed_programs: vec![program(1)],
            next_program_id: 2,
            ..GenesisState::default()
        };
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidProgramID(_))));
    }

    #[test]
    fn ids_must_stay_below_next_id() {
        let g = GenesisState {
            upcoming_programs: vec![program(2)],
            next_program_id: 2,
            ..GenesisState::default()
        };
        assert!(g.validate().is_err());
    }

    fn rewards(v: u64) -> DecCoins {
        let mut d = DecCoins::new();
        d.add("uumee", Dec::from_atomics(v, 0).unwrap()).unwrap();
        d
    }

    fn bonded_alice() -> Bond {
        Bond {
            account: alice(),
            u_token: Coin::new("u/uumee", 7u64),
        }
    }

    fn tracker(v: u64) -> RewardTracker {
        RewardTracker {
            account: alice(),
            u_token: "u/uumee".into(),
            rewards: rewards(v),
        }
    }

    fn accumulator(v: u64) -> RewardAccumulator {
        RewardAccumulator {
            u_token: "u/uumee".into(),
            exponent: 6,
            rewards: rewards(v),
        }
    }

    #[test]
    fn tracker_needs_bond() {
        let g = GenesisState {
            reward_trackers: vec![tracker(1)],
            reward_accumulators: vec![accumulator(1)],
            ..GenesisState::default()
        };
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidGenesis(_))));
    }

    #[test]
    fn tracker_bounded_by_accumulator() {
        let mut g = GenesisState {
            bonds: vec![bonded_alice()],
            reward_trackers: vec![tracker(5)],
            ..GenesisState::default()
        };
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidGenesis(_))));

        g.reward_accumulators = vec![accumulator(4)];
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidGenesis(_))));

        g.reward_accumulators = vec![accumulator(5)];
        g.validate().unwrap();
        let mut kv = MemoryKv::new();
        init_genesis(&mut kv, &g).unwrap();
        assert_eq!(export_genesis(&kv).unwrap(), g);
    }

    #[test]
    fn zero_bond_and_empty_tracker_rejected() {
        let g = GenesisState {
            bonds: vec![Bond {
                account: alice(),
                u_token: Coin::zero("u/uumee"),
            }],
            ..GenesisState::default()
        };
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidAmount(_))));

        let mut empty = tracker(1);
        empty.rewards = DecCoins::new();
        let g = GenesisState {
            bonds: vec![bonded_alice()],
            reward_trackers: vec![empty],
            reward_accumulators: vec![accumulator(1)],
            ..GenesisState::default()
        };
        assert!(matches!(g.validate(), Err(IncentiveError::InvalidAmount(_))));
    }

    #[test]
    fn import_derives_totals() {
        let g = GenesisState {
            bonds: vec![Bond {
                account: alice(),
                u_token: Coin::new("u/uumee", 7u64),
            }],
            ..GenesisState::default()
        };
        let mut kv = MemoryKv::new();
        init_genesis(&mut kv, &g).unwrap();
        assert_eq!(store::get_total_bonded(&kv, "u/uumee").unwrap(), Amount::from(7u64));
        check_totals(&kv).unwrap();
        assert_eq!(export_genesis(&kv).unwrap(), g);
    }
}
