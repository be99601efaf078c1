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

//! Staking-collateral incentive engine.

/// End-of-block driver.
pub mod abci;
/// Bond ledger.
pub mod bond;
/// Errors.
pub mod errors;
/// Genesis import/export.
pub mod genesis;
/// Message handlers.
pub mod handler;
/// Engine write handle.
pub mod keeper;
/// Collaborator contracts and in-process implementations.
pub mod keepers;
/// Store key layout.
pub mod keys;
/// Messages.
pub mod msg;
/// Program registry.
pub mod program;
/// Read-only queries.
pub mod query;
/// Reward engine.
pub mod reward;
/// Typed store accessors.
pub mod store;
/// State types.
pub mod types;

pub use abci::BlockOutcome;
pub use errors::IncentiveError;
pub use genesis::GenesisState;
pub use keeper::Keeper;
pub use msg::{Msg, MsgResponse};
pub use query::Querier;
