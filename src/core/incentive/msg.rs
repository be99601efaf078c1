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

//! Messages accepted by the incentive engine.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::types::{IncentiveProgram, Params};
use crate::core::types::{validate_base_denom, validate_utoken_denom, Address, Coin, Coins};
use serde::{Deserialize, Serialize};

/// A user or governance message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    /// Bond collateral uTokens.
    Bond {
        /// Owner.
        account: Address,
        /// Amount to bond.
        u_token: Coin,
    },
    /// Start unbonding bonded uTokens.
    BeginUnbonding {
        /// Owner.
        account: Address,
        /// Amount to unbond.
        u_token: Coin,
    },
    /// Unbond immediately, paying the emergency fee.
    EmergencyUnbond {
        /// Owner.
        account: Address,
        /// Amount to unbond (bonded or already unbonding).
        u_token: Coin,
    },
    /// Claim pending rewards.
    Claim {
        /// Owner.
        account: Address,
    },
    /// Fund an upcoming program.
    Sponsor {
        /// Funding account.
        sponsor: Address,
        /// Program id.
        program: u32,
        /// Offered rewards; must equal the program's total rewards.
        asset: Coin,
    },
    /// Governance: create programs.
    GovCreatePrograms {
        /// Proposed programs (id 0, unfunded).
        programs: Vec<IncentiveProgram>,
        /// Try to fund each program from the community fund.
        from_community_fund: bool,
    },
    /// Governance: replace module parameters.
    GovSetParams {
        /// New parameters.
        params: Params,
    },
}

/// Successful message result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MsgResponse {
    /// Bond accepted.
    Bond,
    /// Unbonding started.
    BeginUnbonding,
    /// Emergency unbond executed.
    EmergencyUnbond {
        /// Penalty donated to the collateral keeper.
        fee: Coin,
    },
    /// Rewards paid.
    Claim {
        /// Paid amount.
        amount: Coins,
    },
    /// Program funded.
    Sponsor,
    /// Programs created.
    GovCreatePrograms {
        /// Assigned ids, in proposal order.
        ids: Vec<u32>,
    },
    /// Parameters replaced.
    GovSetParams,
}

fn validate_u_asset(c: &Coin) -> Result<(), IncentiveError> {
    validate_utoken_denom(&c.denom)?;
    if c.is_zero() {
        return Err(IncentiveError::NilAsset);
    }
    Ok(())
}

impl Msg {
    /// Message name, used as a log field.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Bond { .. } => "bond",
            Msg::BeginUnbonding { .. } => "begin_unbonding",
            Msg::EmergencyUnbond { .. } => "emergency_unbond",
            Msg::Claim { .. } => "claim",
            Msg::Sponsor { .. } => "sponsor",
            Msg::GovCreatePrograms { .. } => "gov_create_programs",
            Msg::GovSetParams { .. } => "gov_set_params",
        }
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), IncentiveError> {
        match self {
            Msg::Bond { u_token, .. }
            | Msg::BeginUnbonding { u_token, .. }
            | Msg::EmergencyUnbond { u_token, .. } => validate_u_asset(u_token),
            Msg::Claim { .. } => Ok(()),
            Msg::Sponsor { program, asset, .. } => {
                if *program == 0 {
                    return Err(IncentiveError::InvalidProgramID("sponsor program id 0".into()));
                }
                validate_base_denom(&asset.denom)?;
                if asset.is_zero() {
                    return Err(IncentiveError::NilAsset);
                }
                Ok(())
            }
            Msg::GovCreatePrograms { programs, .. } => {
                if programs.is_empty() {
                    return Err(IncentiveError::EmptyProposal);
                }
                programs.iter().try_for_each(IncentiveProgram::validate_proposed)
            }
            Msg::GovSetParams { params } => params.validate(),
        }
    }
}
