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

//! Incentive module errors.

use crate::core::incentive::keepers::KeeperError;
use crate::core::math::MathError;
use crate::core::state::persistent_state::StateError;
use crate::core::types::{AddressError, CodecError, DenomError};
use thiserror::Error;

/// Errors surfaced by the incentive engine.
#[derive(Debug, Error)]
pub enum IncentiveError {
    #[error("invalid program id: {0}")]
    InvalidProgramID(String),
    #[error("invalid program status: {0}")]
    InvalidProgramStatus(String),
    #[error("invalid program duration: {0}")]
    InvalidProgramDuration(i64),
    #[error("invalid program start time: {0}")]
    InvalidProgramStart(i64),
    #[error("incentive program has zero rewards")]
    ProgramWithoutRewards,
    #[error("remaining rewards denom does not match total rewards denom")]
    ProgramRewardMismatch,
    #[error("non-funded program has nonzero remaining rewards")]
    NonfundedProgramRewards,
    #[error("proposed program has nonzero remaining rewards: {0}")]
    NonzeroRemainingRewards(String),
    #[error("proposed program is already marked funded")]
    ProposedFundedProgram,
    #[error("program not eligible for sponsorship: {0}")]
    SponsorIneligible(String),
    #[error("invalid sponsorship: {0}")]
    SponsorInvalid(String),
    #[error("insufficient collateral: collateral {collateral}, bonded {bonded}, requested {requested}")]
    InsufficientCollateral {
        collateral: String,
        bonded: String,
        requested: String,
    },
    #[error("insufficient bonded: available {available}, requested {requested}")]
    InsufficientBonded { available: String, requested: String },
    #[error("max unbondings reached: {0}")]
    MaxUnbondings(u32),
    #[error("denom is not a uToken: {0}")]
    NotUToken(String),
    #[error("denom is a uToken: {0}")]
    UToken(String),
    #[error("invalid denom: {0}")]
    InvalidDenom(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid unbonding: {0}")]
    InvalidUnbonding(String),
    #[error("last rewards time cannot decrease: {from} to {to}")]
    DecreaseLastRewardTime { from: i64, to: i64 },
    #[error("next program id cannot decrease: {from} to {to}")]
    DecreaseNextProgramID { from: u32, to: u32 },
    #[error("empty address")]
    EmptyAddress,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("nil or zero asset")]
    NilAsset,
    #[error("empty proposal")]
    EmptyProposal,
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Broken internal invariant (store corruption, tracker above accumulator, ...).
    /// Fatal for the current message or block; nothing from it is committed.
    #[error("invariant broken: {0}")]
    Invariant(String),
    #[error("math: {0}")]
    Math(#[from] MathError),
    #[error("state: {0}")]
    State(#[from] StateError),
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
    #[error("keeper: {0}")]
    Keeper(#[from] KeeperError),
}

impl From<DenomError> for IncentiveError {
    fn from(e: DenomError) -> Self {
        match e {
            DenomError::Invalid(d) => IncentiveError::InvalidDenom(d),
            DenomError::NotUToken(d) => IncentiveError::NotUToken(d),
            DenomError::UToken(d) => IncentiveError::UToken(d),
        }
    }
}

impl From<AddressError> for IncentiveError {
    fn from(e: AddressError) -> Self {
        match e {
            AddressError::Empty => IncentiveError::EmptyAddress,
            other => IncentiveError::InvalidAddress(other.to_string()),
        }
    }
}

impl IncentiveError {
    /// True for block-time regressions, which are logged and swallowed by the block driver.
    pub fn is_clock_regression(&self) -> bool {
        matches!(self, IncentiveError::DecreaseLastRewardTime { .. })
    }
}
