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

//! Application harness: committed sled state plus in-process collaborators.
//!
//! Every message and block tick runs against a fresh [`StateBatch`]. On
//! success the batch is committed in one sled transaction; on failure the
//! batch is dropped and the collaborators are restored from a snapshot taken
//! before the call, so a failed operation leaves nothing behind.

use crate::core::incentive::abci::BlockOutcome;
use crate::core::incentive::bond;
use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::genesis::{self, GenesisState};
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::keepers::{CollateralKeeper, MemoryBank, MemoryCollateral, StaticOracle};
use crate::core::incentive::msg::{Msg, MsgResponse};
use crate::core::incentive::query::Querier;
use crate::core::incentive::store;
use crate::core::incentive::types::ProgramStatus;
use crate::core::state::batch::StateBatch;
use crate::core::state::merkle::Hash32;
use crate::core::state::persistent_state::{KvOp, PersistentState};
use crate::core::types::{Address, Coin};
use crate::monitoring::metrics::Metrics;
use std::sync::Arc;
use tracing::{debug, info, warn};

type Snapshot = (MemoryBank, MemoryCollateral);

/// Incentive application over persistent state.
pub struct App {
    state: PersistentState,
    bank: MemoryBank,
    collateral: MemoryCollateral,
    oracle: StaticOracle,
    metrics: Option<Arc<Metrics>>,
}

impl App {
    /// Wrap an opened store and its collaborators.
    pub fn new(
        state: PersistentState,
        bank: MemoryBank,
        collateral: MemoryCollateral,
        oracle: StaticOracle,
    ) -> Self {
        Self {
            state,
            bank,
            collateral,
            oracle,
            metrics: None,
        }
    }

    /// Report to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// True if nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Import genesis into an empty store.
    pub fn init_genesis(&mut self, g: &GenesisState) -> Result<(), IncentiveError> {
        if !self.state.is_empty() {
            return Err(IncentiveError::InvalidGenesis("store already initialized".into()));
        }
        let mut batch = StateBatch::new(&self.state);
        genesis::init_genesis(&mut batch, g)?;
        let ops = batch.into_ops();
        self.state.commit_atomic(ops)?;
        self.refresh_gauges();
        info!(
            next_program_id = g.next_program_id,
            last_rewards_time = g.last_rewards_time,
            bonds = g.bonds.len(),
            "incentive genesis imported"
        );
        Ok(())
    }

    /// Export the full incentive state.
    pub fn export_genesis(&self) -> Result<GenesisState, IncentiveError> {
        genesis::export_genesis(&self.state)
    }

    fn snapshot(&self) -> Snapshot {
        (self.bank.clone(), self.collateral.clone())
    }

    fn finish<T>(
        &mut self,
        result: Result<(T, Vec<KvOp>), IncentiveError>,
        snapshot: Snapshot,
    ) -> Result<T, IncentiveError> {
        let committed = result.and_then(|(out, ops)| {
            self.state.commit_atomic(ops)?;
            Ok(out)
        });
        if committed.is_err() {
            let (bank, collateral) = snapshot;
            self.bank = bank;
            self.collateral = collateral;
        }
        committed
    }

    /// Execute one message atomically.
    pub fn deliver(&mut self, msg: &Msg) -> Result<MsgResponse, IncentiveError> {
        let snapshot = self.snapshot();
        let result = {
            let mut batch = StateBatch::new(&self.state);
            let out = Keeper::new(&mut batch, &mut self.bank, &mut self.collateral).handle(msg);
            out.map(|r| (r, batch.into_ops()))
        };
        let result = self.finish(result, snapshot);

        match &result {
            Ok(resp) => {
                debug!(msg = msg.name(), "message committed");
                if let Some(m) = self.metrics.as_ref() {
                    m.messages_accepted_total.inc();
                    if matches!(resp, MsgResponse::Claim { amount } if !amount.is_empty()) {
                        m.claims_total.inc();
                    }
                }
                self.refresh_gauges();
            }
            Err(e) => {
                warn!(msg = msg.name(), error = %e, "message rejected");
                if let Some(m) = self.metrics.as_ref() {
                    m.messages_rejected_total.inc();
                }
            }
        }
        result
    }

    /// Run the block driver at block time `t` and commit its writes.
    pub fn end_block(&mut self, t: i64) -> Result<BlockOutcome, IncentiveError> {
        let snapshot = self.snapshot();
        let result = {
            let mut batch = StateBatch::new(&self.state);
            let out = Keeper::new(&mut batch, &mut self.bank, &mut self.collateral).end_block(t);
            out.map(|o| (o, batch.into_ops()))
        };
        let outcome = self.finish(result, snapshot)?;

        if let Some(m) = self.metrics.as_ref() {
            match outcome {
                BlockOutcome::Processed { .. } => m.blocks_processed_total.inc(),
                BlockOutcome::Skipped { .. } => m.blocks_skipped_total.inc(),
            }
        }
        if let BlockOutcome::Processed { transitions, .. } = &outcome {
            if !transitions.is_empty() {
                self.refresh_gauges();
            }
        }
        if let Some(m) = self.metrics.as_ref() {
            m.last_rewards_time.set(store::get_last_rewards_time(&self.state)?);
        }
        Ok(outcome)
    }

    /// Liquidation hook entry: shrink `addr`'s bond and unbondings to fit
    /// `new_collateral`.
    pub fn force_unbond_to(&mut self, addr: &Address, new_collateral: &Coin) -> Result<(), IncentiveError> {
        let snapshot = self.snapshot();
        let result = {
            let mut batch = StateBatch::new(&self.state);
            let out = Keeper::new(&mut batch, &mut self.bank, &mut self.collateral)
                .force_unbond_to(addr, new_collateral);
            out.map(|()| ((), batch.into_ops()))
        };
        self.finish(result, snapshot)
    }

    /// Collateral keeper seizes `u_coin` from `addr` (liquidation), then
    /// calls the liquidation hook with what is left.
    pub fn liquidate(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), IncentiveError> {
        let snapshot = self.snapshot();
        let result = self.seize_and_unbond(addr, u_coin);
        self.finish(result, snapshot)
    }

    fn seize_and_unbond(&mut self, addr: &Address, u_coin: &Coin) -> Result<((), Vec<KvOp>), IncentiveError> {
        self.collateral.remove(addr, u_coin)?;
        let left = self.collateral.collateral(addr, &u_coin.denom);
        let mut batch = StateBatch::new(&self.state);
        Keeper::new(&mut batch, &mut self.bank, &mut self.collateral).force_unbond_to(addr, &left)?;
        Ok(((), batch.into_ops()))
    }

    /// Collateral keeper withdrawal: only collateral beyond `bonded + unbonding` may leave.
    pub fn withdraw_collateral(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), IncentiveError> {
        let held = self.collateral.collateral(addr, &u_coin.denom);
        let restricted = bond::restricted_collateral(&self.state, addr, &u_coin.denom)?;
        let free = held.amount.saturating_sub(restricted.amount);
        if u_coin.amount > free {
            return Err(IncentiveError::InsufficientCollateral {
                collateral: held.to_string(),
                bonded: restricted.to_string(),
                requested: u_coin.to_string(),
            });
        }
        self.collateral.remove(addr, u_coin)?;
        Ok(())
    }

    /// Committed state, for the read helpers in `incentive::store`.
    pub fn store(&self) -> &PersistentState {
        &self.state
    }

    /// Read-only view over committed state.
    pub fn querier(&self) -> Querier<'_, PersistentState> {
        Querier::new(&self.state, &self.collateral, &self.oracle)
    }

    /// Merkle root over the committed incentive key space.
    pub fn state_root(&self) -> Result<Hash32, IncentiveError> {
        Ok(self.state.state_root()?)
    }

    /// Flush committed state to disk.
    pub fn flush(&self) -> Result<(), IncentiveError> {
        Ok(self.state.flush()?)
    }

    /// In-process bank.
    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    /// In-process bank, for seeding balances.
    pub fn bank_mut(&mut self) -> &mut MemoryBank {
        &mut self.bank
    }

    /// In-process collateral ledger.
    pub fn collateral(&self) -> &MemoryCollateral {
        &self.collateral
    }

    /// In-process collateral ledger, for seeding deposits.
    pub fn collateral_mut(&mut self) -> &mut MemoryCollateral {
        &mut self.collateral
    }

    fn refresh_gauges(&self) {
        let Some(m) = self.metrics.as_ref() else {
            return;
        };
        let gauges = [
            (ProgramStatus::Upcoming, &m.programs_upcoming),
            (ProgramStatus::Ongoing, &m.programs_ongoing),
            (ProgramStatus::Completed, &m.programs_completed),
        ];
        for (status, g) in gauges {
            match store::get_programs(&self.state, status) {
                Ok(list) => g.set(i64::try_from(list.len()).unwrap_or(i64::MAX)),
                Err(e) => warn!(error = %e, %status, "program gauge refresh failed"),
            }
        }
        if let Ok(t) = store::get_last_rewards_time(&self.state) {
            m.last_rewards_time.set(t);
        }
    }
}
