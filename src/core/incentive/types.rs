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

//! Incentive module state types and their stateless validation.

use crate::core::incentive::errors::IncentiveError;
use crate::core::math::Dec;
use crate::core::types::{
    validate_base_denom, validate_utoken_denom, Address, Coin, DecCoins,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 86_400;

/// Lifecycle status of an incentive program. Stored implicitly by key partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    /// Passed, not yet started.
    Upcoming,
    /// Currently distributing rewards.
    Ongoing,
    /// Ended, or cancelled for lack of funding.
    Completed,
}

impl ProgramStatus {
    /// All statuses, in lookup order.
    pub const ALL: [ProgramStatus; 3] = [
        ProgramStatus::Upcoming,
        ProgramStatus::Ongoing,
        ProgramStatus::Completed,
    ];
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProgramStatus::Upcoming => "upcoming",
            ProgramStatus::Ongoing => "ongoing",
            ProgramStatus::Completed => "completed",
        })
    }
}

impl FromStr for ProgramStatus {
    type Err = IncentiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(ProgramStatus::Upcoming),
            "ongoing" => Ok(ProgramStatus::Ongoing),
            "completed" => Ok(ProgramStatus::Completed),
            other => Err(IncentiveError::InvalidProgramStatus(other.to_string())),
        }
    }
}

/// A time-bounded reward schedule for holders of one bonded uToken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveProgram {
    /// Unique id, assigned on creation (0 while proposed).
    pub id: u32,
    /// Unix seconds. Rewritten to the actual start block time when the program starts.
    pub start_time: i64,
    /// Seconds.
    pub duration: i64,
    /// Incentivized uToken denom.
    pub u_token: String,
    /// Base-token rewards over the whole program.
    pub total_rewards: Coin,
    /// Rewards not yet distributed (zero until funded).
    pub remaining_rewards: Coin,
    /// Whether `total_rewards` were transferred to the module.
    pub funded: bool,
}

impl IncentiveProgram {
    /// A proposed (unfunded, id 0) program.
    pub fn proposed(u_token: impl Into<String>, start_time: i64, duration: i64, total_rewards: Coin) -> Self {
        let remaining_rewards = Coin::zero(total_rewards.denom.clone());
        Self {
            id: 0,
            start_time,
            duration,
            u_token: u_token.into(),
            total_rewards,
            remaining_rewards,
            funded: false,
        }
    }

    /// Unix seconds at which an ongoing program completes.
    pub fn end_time(&self) -> i64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Stateless checks shared by proposed and passed programs.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        validate_utoken_denom(&self.u_token)?;
        validate_base_denom(&self.total_rewards.denom)?;
        if self.total_rewards.is_zero() {
            return Err(IncentiveError::ProgramWithoutRewards);
        }
        if self.remaining_rewards.denom != self.total_rewards.denom {
            return Err(IncentiveError::ProgramRewardMismatch);
        }
        if self.remaining_rewards.amount > self.total_rewards.amount {
            return Err(IncentiveError::InvalidGenesis(format!(
                "program {} remaining rewards exceed total",
                self.id
            )));
        }
        if !self.funded && !self.remaining_rewards.is_zero() {
            return Err(IncentiveError::NonfundedProgramRewards);
        }
        if self.duration <= 0 {
            return Err(IncentiveError::InvalidProgramDuration(self.duration));
        }
        if self.start_time <= 0 {
            return Err(IncentiveError::InvalidProgramStart(self.start_time));
        }
        Ok(())
    }

    /// Checks for a program carried by a governance proposal.
    pub fn validate_proposed(&self) -> Result<(), IncentiveError> {
        if self.id != 0 {
            return Err(IncentiveError::InvalidProgramID(format!(
                "proposed program must have id 0, got {}",
                self.id
            )));
        }
        if !self.remaining_rewards.is_zero() {
            return Err(IncentiveError::NonzeroRemainingRewards(
                self.remaining_rewards.to_string(),
            ));
        }
        if self.funded {
            return Err(IncentiveError::ProposedFundedProgram);
        }
        self.validate()
    }

    /// Checks for a program already stored (genesis import).
    pub fn validate_passed(&self) -> Result<(), IncentiveError> {
        if self.id == 0 {
            return Err(IncentiveError::InvalidProgramID("stored program id is zero".into()));
        }
        self.validate()
    }
}

/// A pending withdrawal of bonded uTokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unbonding {
    /// Unix seconds at creation.
    pub start: i64,
    /// Unix seconds at which the unbonding matures.
    pub end: i64,
    /// Unbonding amount.
    pub u_token: Coin,
}

impl Unbonding {
    /// True if matured at `now`, either by its recorded end or by `start + duration`
    /// under the current unbonding duration parameter.
    pub fn is_mature(&self, now: i64, duration: i64) -> bool {
        self.end <= now || self.start.saturating_add(duration) <= now
    }

    /// Stateless checks.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        if self.end <= self.start {
            return Err(IncentiveError::InvalidUnbonding(format!(
                "end {} <= start {}",
                self.end, self.start
            )));
        }
        validate_utoken_denom(&self.u_token.denom)?;
        Ok(())
    }
}

/// All unbondings of one account for one uToken denom (genesis form).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUnbondings {
    /// Owner.
    pub account: Address,
    /// uToken denom of every entry.
    pub u_token: String,
    /// Oldest first.
    pub unbondings: Vec<Unbonding>,
}

impl AccountUnbondings {
    /// Stateless checks.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        validate_utoken_denom(&self.u_token)?;
        for u in self.unbondings.iter() {
            if u.u_token.denom != self.u_token {
                return Err(IncentiveError::InvalidUnbonding(format!(
                    "unbonding denom {} does not match group denom {}",
                    u.u_token.denom, self.u_token
                )));
            }
            u.validate()?;
        }
        Ok(())
    }
}

/// Bonded amount of one uToken for one account (genesis form).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// Owner.
    pub account: Address,
    /// Bonded uTokens.
    pub u_token: Coin,
}

impl Bond {
    /// Stateless checks. Zero bonds are never stored.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        validate_utoken_denom(&self.u_token.denom)?;
        if self.u_token.is_zero() {
            return Err(IncentiveError::InvalidAmount(format!("zero bond {}", self.u_token.denom)));
        }
        Ok(())
    }
}

/// Snapshot of an accumulator at an account's last settlement for one uToken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTracker {
    /// Owner.
    pub account: Address,
    /// Bonded uToken denom.
    pub u_token: String,
    /// Accumulator value at last settlement.
    pub rewards: DecCoins,
}

impl RewardTracker {
    /// Stateless checks. Empty trackers are never stored.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        validate_utoken_denom(&self.u_token)?;
        if self.rewards.is_empty() {
            return Err(IncentiveError::InvalidAmount(format!("empty tracker {}", self.u_token)));
        }
        for d in self.rewards.denoms() {
            validate_base_denom(d)?;
        }
        Ok(())
    }
}

/// Rewards earned per `10^exponent` bonded uTokens since genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccumulator {
    /// Bonded uToken denom.
    pub u_token: String,
    /// Decimal exponent of the underlying token; fixed on first initialization.
    pub exponent: u32,
    /// Monotone non-decreasing reward vector.
    pub rewards: DecCoins,
}

impl RewardAccumulator {
    /// Empty accumulator for a denom.
    pub fn empty(u_token: impl Into<String>) -> Self {
        Self {
            u_token: u_token.into(),
            exponent: 0,
            rewards: DecCoins::new(),
        }
    }

    /// Stateless checks.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        validate_utoken_denom(&self.u_token)?;
        for d in self.rewards.denoms() {
            validate_base_denom(d)?;
        }
        Ok(())
    }
}

/// Module parameters, set by governance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Max concurrent unbondings per account and denom (0 = unlimited).
    pub max_unbondings: u32,
    /// Seconds; 0 makes unbonding instant.
    pub unbonding_duration: i64,
    /// Fraction of an emergency unbond donated as a penalty, in `[0, 1)`.
    pub emergency_unbond_fee: Dec,
    /// Account from which governance programs may be auto-funded.
    #[serde(default)]
    pub community_fund_address: Option<Address>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_unbondings: 10,
            unbonding_duration: SECONDS_PER_DAY,
            emergency_unbond_fee: Dec::percent(1),
            community_fund_address: None,
        }
    }
}

impl Params {
    /// Stateless checks.
    pub fn validate(&self) -> Result<(), IncentiveError> {
        if self.unbonding_duration < 0 {
            return Err(IncentiveError::InvalidParams(format!(
                "unbonding duration cannot be negative: {}",
                self.unbonding_duration
            )));
        }
        if self.emergency_unbond_fee >= Dec::one() {
            return Err(IncentiveError::InvalidParams(format!(
                "invalid emergency unbonding fee: {}",
                self.emergency_unbond_fee
            )));
        }
        Ok(())
    }
}
