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

//! Program registry: creation, funding and status transitions.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::keepers::KeeperError;
use crate::core::incentive::store;
use crate::core::incentive::types::{IncentiveProgram, ProgramStatus};
use crate::core::state::batch::KvStore;
use crate::core::types::{to_token_denom, Address, Coin, Coins};
use tracing::{info, warn};

/// Status changes made by one [`Keeper::advance_programs`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramTransitions {
    /// Ongoing programs that reached their end.
    pub completed: Vec<u32>,
    /// Funded upcoming programs that started.
    pub started: Vec<u32>,
    /// Unfunded upcoming programs cancelled at their start time.
    pub cancelled: Vec<u32>,
}

impl ProgramTransitions {
    /// True if nothing moved.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.started.is_empty() && self.cancelled.is_empty()
    }
}

impl<S: KvStore + ?Sized> Keeper<'_, S> {
    /// Register a proposed program as upcoming and return its id. With
    /// `from_community_fund`, the program is funded from the community fund
    /// when that account holds strictly more than the program's rewards.
    pub fn create_program(
        &mut self,
        proposed: &IncentiveProgram,
        from_community_fund: bool,
    ) -> Result<u32, IncentiveError> {
        proposed.validate_proposed()?;
        self.init_accumulator_exponent(&proposed.u_token)?;

        let id = store::get_next_program_id(&*self.store)?;
        let next = id
            .checked_add(1)
            .ok_or_else(|| IncentiveError::InvalidProgramID("program id space exhausted".into()))?;
        store::set_next_program_id(&mut *self.store, next)?;

        let mut program = proposed.clone();
        program.id = id;

        if from_community_fund {
            let params = store::get_params(&*self.store)?;
            match params.community_fund_address {
                Some(fund) if self.fund_exceeds(&fund, &program.total_rewards) => {
                    self.assets
                        .transfer_to_module(&fund, &Coins::from_coin(program.total_rewards.clone()))?;
                    program.funded = true;
                    program.remaining_rewards = program.total_rewards.clone();
                    info!(program_id = id, rewards = %program.total_rewards, "program funded by community fund");
                }
                Some(fund) => {
                    warn!(program_id = id, fund = %fund, rewards = %program.total_rewards,
                        "community fund insufficient, program left unfunded");
                }
                None => {
                    warn!(program_id = id, "no community fund address, program left unfunded");
                }
            }
        }

        store::set_program(&mut *self.store, &program, ProgramStatus::Upcoming)?;
        info!(program_id = id, u_denom = %program.u_token, start = program.start_time,
            duration = program.duration, funded = program.funded, "incentive program created");
        Ok(id)
    }

    fn fund_exceeds(&self, fund: &Address, rewards: &Coin) -> bool {
        self.assets.spendable(fund).amount_of(&rewards.denom) > rewards.amount
    }

    /// Fix the accumulator exponent of a uToken denom on first use.
    fn init_accumulator_exponent(&mut self, u_denom: &str) -> Result<(), IncentiveError> {
        let mut acc = store::get_accumulator(&*self.store, u_denom)?;
        if acc.exponent != 0 {
            return Ok(());
        }
        let base = to_token_denom(u_denom)?;
        acc.exponent = self.collateral.token_exponent(base).map_err(|e| match e {
            KeeperError::UnknownToken(d) => IncentiveError::NotFound(format!("registered token {d}")),
            other => IncentiveError::Keeper(other),
        })?;
        store::set_accumulator(&mut *self.store, &acc)
    }

    /// Fund an upcoming, unfunded program from `sponsor`. The offered asset
    /// must equal the program's total rewards.
    pub fn sponsor_program(
        &mut self,
        sponsor: &Address,
        id: u32,
        asset: &Coin,
    ) -> Result<(), IncentiveError> {
        let (mut program, status) = store::get_program(&*self.store, id)?
            .ok_or_else(|| IncentiveError::NotFound(format!("incentive program {id}")))?;
        if status != ProgramStatus::Upcoming {
            return Err(IncentiveError::SponsorIneligible(format!(
                "program {id} is {status}"
            )));
        }
        if program.funded {
            return Err(IncentiveError::SponsorIneligible(format!(
                "program {id} is already funded"
            )));
        }
        if *asset != program.total_rewards {
            return Err(IncentiveError::SponsorInvalid(format!(
                "offered {asset}, program {id} requires {}",
                program.total_rewards
            )));
        }
        if !self.assets.spendable(sponsor).covers(asset) {
            return Err(IncentiveError::SponsorInvalid(format!(
                "sponsor {sponsor} cannot cover {asset}"
            )));
        }

        self.assets
            .transfer_to_module(sponsor, &Coins::from_coin(asset.clone()))?;
        program.funded = true;
        program.remaining_rewards = program.total_rewards.clone();
        store::set_program(&mut *self.store, &program, ProgramStatus::Upcoming)?;
        info!(program_id = id, sponsor = %sponsor, rewards = %asset, "program sponsored");
        Ok(())
    }

    /// Move programs between statuses at block time `t`. Ongoing programs are
    /// completed before upcoming ones are started, so no program starts and
    /// ends in the same block.
    pub(crate) fn advance_programs(&mut self, t: i64) -> Result<ProgramTransitions, IncentiveError> {
        let mut out = ProgramTransitions::default();

        for p in store::get_programs(&*self.store, ProgramStatus::Ongoing)? {
            if p.end_time() <= t {
                store::set_program(&mut *self.store, &p, ProgramStatus::Completed)?;
                info!(program_id = p.id, block_time = t, remaining = %p.remaining_rewards,
                    "incentive program completed");
                out.completed.push(p.id);
            }
        }

        for mut p in store::get_programs(&*self.store, ProgramStatus::Upcoming)? {
            if p.start_time > t {
                continue;
            }
            if p.funded {
                p.start_time = t;
                store::set_program(&mut *self.store, &p, ProgramStatus::Ongoing)?;
                info!(program_id = p.id, block_time = t, "incentive program started");
                out.started.push(p.id);
            } else {
                p.remaining_rewards = Coin::zero(p.total_rewards.denom.clone());
                store::set_program(&mut *self.store, &p, ProgramStatus::Completed)?;
                warn!(program_id = p.id, block_time = t, "unfunded incentive program cancelled");
                out.cancelled.push(p.id);
            }
        }
        Ok(out)
    }
}
