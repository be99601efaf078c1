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

//! Typed accessors over the incentive key space.
//!
//! Absent keys read as typed zeros. Zero amounts, empty lists and empty
//! decimal vectors are never written; the key is deleted instead.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keys;
use crate::core::incentive::types::{
    AccountUnbondings, Bond, IncentiveProgram, Params, ProgramStatus, RewardAccumulator,
    RewardTracker, Unbonding,
};
use crate::core::math::Amount;
use crate::core::state::batch::{KvRead, KvStore};
use crate::core::types::{
    decode_canonical_limited, encode_canonical, Address, Coin, Coins, DecCoins, MAX_VALUE_BYTES,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn read<S, T>(s: &S, key: &[u8]) -> Result<Option<T>, IncentiveError>
where
    S: KvRead + ?Sized,
    T: DeserializeOwned,
{
    match s.get(key)? {
        Some(raw) => Ok(Some(decode_canonical_limited(&raw, MAX_VALUE_BYTES)?)),
        None => Ok(None),
    }
}

fn write<S, T>(s: &mut S, key: Vec<u8>, v: &T) -> Result<(), IncentiveError>
where
    S: KvStore + ?Sized,
    T: Serialize,
{
    s.put(key, encode_canonical(v)?);
    Ok(())
}

fn write_amount<S: KvStore + ?Sized>(
    s: &mut S,
    key: Vec<u8>,
    amount: Amount,
) -> Result<(), IncentiveError> {
    if amount.is_zero() {
        s.delete(&key);
        Ok(())
    } else {
        write(s, key, &amount)
    }
}

/// Module parameters (defaults if never set).
pub fn get_params<S: KvRead + ?Sized>(s: &S) -> Result<Params, IncentiveError> {
    Ok(read(s, &keys::params())?.unwrap_or_default())
}

/// Persist module parameters.
pub fn set_params<S: KvStore + ?Sized>(s: &mut S, p: &Params) -> Result<(), IncentiveError> {
    write(s, keys::params(), p)
}

/// Next program id; 1 on an empty store.
pub fn get_next_program_id<S: KvRead + ?Sized>(s: &S) -> Result<u32, IncentiveError> {
    Ok(read(s, &keys::next_program_id())?.unwrap_or(1))
}

/// Set the next program id. It can never move backwards.
pub fn set_next_program_id<S: KvStore + ?Sized>(s: &mut S, id: u32) -> Result<(), IncentiveError> {
    let cur = get_next_program_id(s)?;
    if id < cur {
        return Err(IncentiveError::DecreaseNextProgramID { from: cur, to: id });
    }
    write(s, keys::next_program_id(), &id)
}

/// Unix seconds of the last reward distribution; 0 on an empty store.
pub fn get_last_rewards_time<S: KvRead + ?Sized>(s: &S) -> Result<i64, IncentiveError> {
    Ok(read(s, &keys::last_rewards_time())?.unwrap_or(0))
}

/// Set the last reward distribution time. It can never move backwards.
pub fn set_last_rewards_time<S: KvStore + ?Sized>(s: &mut S, t: i64) -> Result<(), IncentiveError> {
    let cur = get_last_rewards_time(s)?;
    if t < cur {
        return Err(IncentiveError::DecreaseLastRewardTime { from: cur, to: t });
    }
    write(s, keys::last_rewards_time(), &t)
}

/// Program by id together with the partition it lives in.
pub fn get_program<S: KvRead + ?Sized>(
    s: &S,
    id: u32,
) -> Result<Option<(IncentiveProgram, ProgramStatus)>, IncentiveError> {
    for status in ProgramStatus::ALL {
        if let Some(p) = read::<_, IncentiveProgram>(s, &keys::program(status, id))? {
            return Ok(Some((p, status)));
        }
    }
    Ok(None)
}

/// Store a program under `status`, removing it from every other partition.
pub fn set_program<S: KvStore + ?Sized>(
    s: &mut S,
    p: &IncentiveProgram,
    status: ProgramStatus,
) -> Result<(), IncentiveError> {
    if p.id == 0 {
        return Err(IncentiveError::InvalidProgramID("cannot store program id 0".into()));
    }
    for other in ProgramStatus::ALL {
        if other != status {
            s.delete(&keys::program(other, p.id));
        }
    }
    write(s, keys::program(status, p.id), p)
}

/// All programs with `status`, ascending by id.
pub fn get_programs<S: KvRead + ?Sized>(
    s: &S,
    status: ProgramStatus,
) -> Result<Vec<IncentiveProgram>, IncentiveError> {
    let mut out = Vec::new();
    for (_, raw) in s.scan_prefix(&[keys::status_prefix(status)])? {
        out.push(decode_canonical_limited::<IncentiveProgram>(&raw, MAX_VALUE_BYTES)?);
    }
    out.sort_by_key(|p| p.id);
    Ok(out)
}

/// Bonded amount of `denom` for `addr`.
pub fn get_bonded<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<Amount, IncentiveError> {
    Ok(read(s, &keys::bond(addr, denom))?.unwrap_or_default())
}

pub(crate) fn set_bonded<S: KvStore + ?Sized>(
    s: &mut S,
    addr: &Address,
    denom: &str,
    amount: Amount,
) -> Result<(), IncentiveError> {
    write_amount(s, keys::bond(addr, denom), amount)
}

/// Every (denom, amount) `addr` has bonded, ascending by denom.
pub fn get_account_bonds<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
) -> Result<Vec<Coin>, IncentiveError> {
    let mut out = Vec::new();
    for (k, raw) in s.scan_prefix(&keys::bonds_of(addr))? {
        let (_, denom) = keys::parse_account_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed bond key".into()))?;
        let amount: Amount = decode_canonical_limited(&raw, MAX_VALUE_BYTES)?;
        out.push(Coin::new(denom, amount));
    }
    Ok(out)
}

/// Every bond in the store.
pub fn get_all_bonds<S: KvRead + ?Sized>(s: &S) -> Result<Vec<Bond>, IncentiveError> {
    let mut out = Vec::new();
    for (k, raw) in s.scan_prefix(&[keys::PREFIX_BOND])? {
        let (account, denom) = keys::parse_account_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed bond key".into()))?;
        let amount: Amount = decode_canonical_limited(&raw, MAX_VALUE_BYTES)?;
        out.push(Bond {
            account,
            u_token: Coin::new(denom, amount),
        });
    }
    Ok(out)
}

/// Module total bonded for `denom`.
pub fn get_total_bonded<S: KvRead + ?Sized>(s: &S, denom: &str) -> Result<Amount, IncentiveError> {
    Ok(read(s, &keys::total_bonded(denom))?.unwrap_or_default())
}

pub(crate) fn set_total_bonded<S: KvStore + ?Sized>(
    s: &mut S,
    denom: &str,
    amount: Amount,
) -> Result<(), IncentiveError> {
    write_amount(s, keys::total_bonded(denom), amount)
}

/// Module total unbonding for `denom`.
pub fn get_total_unbonding<S: KvRead + ?Sized>(
    s: &S,
    denom: &str,
) -> Result<Amount, IncentiveError> {
    Ok(read(s, &keys::total_unbonding(denom))?.unwrap_or_default())
}

pub(crate) fn set_total_unbonding<S: KvStore + ?Sized>(
    s: &mut S,
    denom: &str,
    amount: Amount,
) -> Result<(), IncentiveError> {
    write_amount(s, keys::total_unbonding(denom), amount)
}

fn all_totals<S: KvRead + ?Sized>(s: &S, prefix: u8) -> Result<Coins, IncentiveError> {
    let mut out = Coins::new();
    for (k, raw) in s.scan_prefix(&[prefix])? {
        let denom = keys::parse_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed total key".into()))?;
        let amount: Amount = decode_canonical_limited(&raw, MAX_VALUE_BYTES)?;
        out.add(&Coin::new(denom, amount))?;
    }
    Ok(out)
}

/// Total bonded for every denom.
pub fn get_all_total_bonded<S: KvRead + ?Sized>(s: &S) -> Result<Coins, IncentiveError> {
    all_totals(s, keys::PREFIX_TOTAL_BONDED)
}

/// Total unbonding for every denom.
pub fn get_all_total_unbonding<S: KvRead + ?Sized>(s: &S) -> Result<Coins, IncentiveError> {
    all_totals(s, keys::PREFIX_TOTAL_UNBONDING)
}

/// Stored unbondings of `addr` in `denom`, oldest first (matured ones included).
pub fn get_unbondings<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<Vec<Unbonding>, IncentiveError> {
    Ok(read(s, &keys::unbondings(addr, denom))?.unwrap_or_default())
}

pub(crate) fn put_unbondings<S: KvStore + ?Sized>(
    s: &mut S,
    addr: &Address,
    denom: &str,
    list: &[Unbonding],
) -> Result<(), IncentiveError> {
    let key = keys::unbondings(addr, denom);
    if list.is_empty() {
        s.delete(&key);
        Ok(())
    } else {
        write(s, key, &list.to_vec())
    }
}

/// Denoms for which `addr` has stored unbondings.
pub fn get_unbonding_denoms<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
) -> Result<Vec<String>, IncentiveError> {
    let mut out = Vec::new();
    for (k, _) in s.scan_prefix(&keys::unbondings_of(addr))? {
        let (_, denom) = keys::parse_account_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed unbonding key".into()))?;
        out.push(denom);
    }
    Ok(out)
}

/// Every stored unbonding group.
pub fn get_all_unbondings<S: KvRead + ?Sized>(
    s: &S,
) -> Result<Vec<AccountUnbondings>, IncentiveError> {
    let mut out = Vec::new();
    for (k, raw) in s.scan_prefix(&[keys::PREFIX_UNBONDINGS])? {
        let (account, u_token) = keys::parse_account_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed unbonding key".into()))?;
        let unbondings: Vec<Unbonding> = decode_canonical_limited(&raw, MAX_VALUE_BYTES)?;
        out.push(AccountUnbondings {
            account,
            u_token,
            unbondings,
        });
    }
    Ok(out)
}

/// Accumulator for `denom`; an empty one with exponent 0 if never written.
pub fn get_accumulator<S: KvRead + ?Sized>(
    s: &S,
    denom: &str,
) -> Result<RewardAccumulator, IncentiveError> {
    Ok(read(s, &keys::accumulator(denom))?.unwrap_or_else(|| RewardAccumulator::empty(denom)))
}

pub(crate) fn set_accumulator<S: KvStore + ?Sized>(
    s: &mut S,
    acc: &RewardAccumulator,
) -> Result<(), IncentiveError> {
    let key = keys::accumulator(&acc.u_token);
    if acc.exponent == 0 && acc.rewards.is_empty() {
        s.delete(&key);
        Ok(())
    } else {
        write(s, key, acc)
    }
}

/// Every stored accumulator, ascending by denom.
pub fn get_all_accumulators<S: KvRead + ?Sized>(
    s: &S,
) -> Result<Vec<RewardAccumulator>, IncentiveError> {
    let mut out = Vec::new();
    for (_, raw) in s.scan_prefix(&[keys::PREFIX_ACCUMULATOR])? {
        out.push(decode_canonical_limited(&raw, MAX_VALUE_BYTES)?);
    }
    Ok(out)
}

/// Tracker of `addr` for `denom` (empty if absent).
pub fn get_tracker<S: KvRead + ?Sized>(
    s: &S,
    addr: &Address,
    denom: &str,
) -> Result<DecCoins, IncentiveError> {
    Ok(read(s, &keys::tracker(addr, denom))?.unwrap_or_default())
}

pub(crate) fn set_tracker<S: KvStore + ?Sized>(
    s: &mut S,
    addr: &Address,
    denom: &str,
    rewards: &DecCoins,
) -> Result<(), IncentiveError> {
    let key = keys::tracker(addr, denom);
    if rewards.is_empty() {
        s.delete(&key);
        Ok(())
    } else {
        write(s, key, rewards)
    }
}

pub(crate) fn clear_tracker<S: KvStore + ?Sized>(s: &mut S, addr: &Address, denom: &str) {
    s.delete(&keys::tracker(addr, denom));
}

/// Every stored tracker.
pub fn get_all_trackers<S: KvRead + ?Sized>(s: &S) -> Result<Vec<RewardTracker>, IncentiveError> {
    let mut out = Vec::new();
    for (k, raw) in s.scan_prefix(&[keys::PREFIX_TRACKER])? {
        let (account, u_token) = keys::parse_account_denom_key(&k)
            .ok_or_else(|| IncentiveError::Invariant("malformed tracker key".into()))?;
        let rewards: DecCoins = decode_canonical_limited(&raw, MAX_VALUE_BYTES)?;
        out.push(RewardTracker {
            account,
            u_token,
            rewards,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Dec;
    use crate::core::state::batch::MemoryKv;
    use crate::core::types::ADDRESS_LEN;

    #[test]
    fn absent_keys_read_as_zero() {
        let kv = MemoryKv::new();
        let a = Address::from_bytes([1u8; ADDRESS_LEN]);
        assert_eq!(get_next_program_id(&kv).unwrap(), 1);
        assert_eq!(get_last_rewards_time(&kv).unwrap(), 0);
        assert!(get_bonded(&kv, &a, "u/uumee").unwrap().is_zero());
        assert!(get_tracker(&kv, &a, "u/uumee").unwrap().is_empty());
        assert_eq!(get_accumulator(&kv, "u/uumee").unwrap().exponent, 0);
        assert_eq!(get_params(&kv).unwrap(), Params::default());
    }

    #[test]
    fn zero_writes_delete() {
        let mut kv = MemoryKv::new();
        let a = Address::from_bytes([1u8; ADDRESS_LEN]);
        set_bonded(&mut kv, &a, "u/uumee", Amount::from(5u64)).unwrap();
        assert_eq!(kv.pairs().len(), 1);
        set_bonded(&mut kv, &a, "u/uumee", Amount::zero()).unwrap();
        assert!(kv.pairs().is_empty());

        let mut t = DecCoins::new();
        t.add("uumee", Dec::percent(3)).unwrap();
        set_tracker(&mut kv, &a, "u/uumee", &t).unwrap();
        set_tracker(&mut kv, &a, "u/uumee", &DecCoins::new()).unwrap();
        assert!(kv.pairs().is_empty());
    }

    #[test]
    fn scalars_never_decrease() {
        let mut kv = MemoryKv::new();
        set_last_rewards_time(&mut kv, 10).unwrap();
        assert!(matches!(
            set_last_rewards_time(&mut kv, 9),
            Err(IncentiveError::DecreaseLastRewardTime { from: 10, to: 9 })
        ));
        set_next_program_id(&mut kv, 4).unwrap();
        assert!(set_next_program_id(&mut kv, 3).is_err());
    }

    #[test]
    fn program_moves_between_partitions() {
        let mut kv = MemoryKv::new();
        let mut p =
            IncentiveProgram::proposed("u/uumee", 10, 10, Coin::new("uumee", 1u64));
        p.id = 3;
        set_program(&mut kv, &p, ProgramStatus::Upcoming).unwrap();
        set_program(&mut kv, &p, ProgramStatus::Ongoing).unwrap();
        assert_eq!(get_program(&kv, 3).unwrap().map(|(_, s)| s), Some(ProgramStatus::Ongoing));
        assert!(get_programs(&kv, ProgramStatus::Upcoming).unwrap().is_empty());
        assert_eq!(kv.pairs().len(), 1);
    }
}
