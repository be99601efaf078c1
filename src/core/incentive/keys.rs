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

//! Key layout of the incentive store.
//!
//! ```text
//! 0x01                                   params
//! 0x02 | 0x03 | 0x04  id(u32 LE)         upcoming / ongoing / completed program
//! 0x05                                   next program id
//! 0x06                                   last rewards time
//! 0x07  denom 0x00                       total bonded
//! 0x08  len addr  denom 0x00             bonded amount
//! 0x09  denom 0x00                       reward accumulator
//! 0x0A  len addr  denom 0x00             reward tracker
//! 0x0B  len addr  denom 0x00             unbondings
//! 0x0C  denom 0x00                       total unbonding
//! ```

use crate::core::incentive::types::ProgramStatus;
use crate::core::types::Address;

pub(crate) const PREFIX_PARAMS: u8 = 0x01;
pub(crate) const PREFIX_UPCOMING: u8 = 0x02;
pub(crate) const PREFIX_ONGOING: u8 = 0x03;
pub(crate) const PREFIX_COMPLETED: u8 = 0x04;
pub(crate) const PREFIX_NEXT_ID: u8 = 0x05;
pub(crate) const PREFIX_LAST_REWARDS_TIME: u8 = 0x06;
pub(crate) const PREFIX_TOTAL_BONDED: u8 = 0x07;
pub(crate) const PREFIX_BOND: u8 = 0x08;
pub(crate) const PREFIX_ACCUMULATOR: u8 = 0x09;
pub(crate) const PREFIX_TRACKER: u8 = 0x0A;
pub(crate) const PREFIX_UNBONDINGS: u8 = 0x0B;
pub(crate) const PREFIX_TOTAL_UNBONDING: u8 = 0x0C;

pub(crate) fn params() -> Vec<u8> {
    vec![PREFIX_PARAMS]
}

pub(crate) fn next_program_id() -> Vec<u8> {
    vec![PREFIX_NEXT_ID]
}

pub(crate) fn last_rewards_time() -> Vec<u8> {
    vec![PREFIX_LAST_REWARDS_TIME]
}

pub(crate) fn status_prefix(status: ProgramStatus) -> u8 {
    match status {
        ProgramStatus::Upcoming => PREFIX_UPCOMING,
        ProgramStatus::Ongoing => PREFIX_ONGOING,
        ProgramStatus::Completed => PREFIX_COMPLETED,
    }
}

pub(crate) fn program(status: ProgramStatus, id: u32) -> Vec<u8> {
    let mut k = Vec::with_capacity(5);
    k.push(status_prefix(status));
    k.extend_from_slice(&id.to_le_bytes());
    k
}

fn denom_key(prefix: u8, denom: &str) -> Vec<u8> {
    let mut k = Vec::with_capacity(denom.len() + 2);
    k.push(prefix);
    k.extend_from_slice(denom.as_bytes());
    k.push(0);
    k
}

fn account_prefix(prefix: u8, addr: &Address) -> Vec<u8> {
    let raw = addr.as_bytes();
    let mut k = Vec::with_capacity(raw.len() + 2);
    k.push(prefix);
    // address width fits a byte
    k.push(raw.len() as u8);
    k.extend_from_slice(raw);
    k
}

fn account_denom_key(prefix: u8, addr: &Address, denom: &str) -> Vec<u8> {
    let mut k = account_prefix(prefix, addr);
    k.extend_from_slice(denom.as_bytes());
    k.push(0);
    k
}

pub(crate) fn total_bonded(denom: &str) -> Vec<u8> {
    denom_key(PREFIX_TOTAL_BONDED, denom)
}

pub(crate) fn total_unbonding(denom: &str) -> Vec<u8> {
    denom_key(PREFIX_TOTAL_UNBONDING, denom)
}

pub(crate) fn accumulator(denom: &str) -> Vec<u8> {
    denom_key(PREFIX_ACCUMULATOR, denom)
}

pub(crate) fn bond(addr: &Address, denom: &str) -> Vec<u8> {
    account_denom_key(PREFIX_BOND, addr, denom)
}

pub(crate) fn bonds_of(addr: &Address) -> Vec<u8> {
    account_prefix(PREFIX_BOND, addr)
}

pub(crate) fn tracker(addr: &Address, denom: &str) -> Vec<u8> {
    account_denom_key(PREFIX_TRACKER, addr, denom)
}

pub(crate) fn unbondings(addr: &Address, denom: &str) -> Vec<u8> {
    account_denom_key(PREFIX_UNBONDINGS, addr, denom)
}

pub(crate) fn unbondings_of(addr: &Address) -> Vec<u8> {
    account_prefix(PREFIX_UNBONDINGS, addr)
}

/// Parse a `prefix denom 0x00` key.
pub(crate) fn parse_denom_key(key: &[u8]) -> Option<String> {
    let body = key.get(1..)?;
    let denom = body.strip_suffix(&[0])?;
    String::from_utf8(denom.to_vec()).ok()
}

/// Parse a `prefix len addr denom 0x00` key.
pub(crate) fn parse_account_denom_key(key: &[u8]) -> Option<(Address, String)> {
    let len = usize::from(*key.get(1)?);
    let addr = Address::from_slice(key.get(2..2 + len)?).ok()?;
    let denom = key.get(2 + len..)?.strip_suffix(&[0])?;
    Some((addr, String::from_utf8(denom.to_vec()).ok()?))
}

/// Parse a program key.
pub(crate) fn parse_program_key(key: &[u8]) -> Option<u32> {
    let raw: [u8; 4] = key.get(1..5)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}
