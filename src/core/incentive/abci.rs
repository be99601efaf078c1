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

//! End-of-block driver.

use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::keeper::Keeper;
use crate::core::incentive::program::ProgramTransitions;
use crate::core::incentive::store;
use crate::core::state::batch::KvStore;
use crate::core::types::Coins;
use tracing::warn;

/// Result of one end-of-block call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Rewards distributed and programs advanced.
    Processed {
        /// Block time.
        block_time: i64,
        /// Rewards moved into accumulators this block.
        distributed: Coins,
        /// Program status changes.
        transitions: ProgramTransitions,
    },
    /// Block ignored because its time is unusable.
    Skipped {
        /// Block time.
        block_time: i64,
        /// Last rewards time at the moment of the skip.
        last_rewards_time: i64,
    },
}

impl<S: KvStore + ?Sized> Keeper<'_, S> {
    /// Distribute rewards up to block time `t`, then move program statuses.
    ///
    /// A negative or backwards block time skips the block and leaves state
    /// untouched. The first block after genesis (no prior rewards time)
    /// distributes nothing and only records `t`.
    pub fn end_block(&mut self, t: i64) -> Result<BlockOutcome, IncentiveError> {
        let last = store::get_last_rewards_time(&*self.store)?;
        if t < 0 {
            warn!(block_time = t, "negative block time, skipping incentive block");
            return Ok(BlockOutcome::Skipped {
                block_time: t,
                last_rewards_time: last,
            });
        }
        let prev = if last <= 0 { t } else { last };
        if t < prev {
            warn!(block_time = t, last_rewards_time = prev, "block time went backwards, skipping incentive block");
            return Ok(BlockOutcome::Skipped {
                block_time: t,
                last_rewards_time: last,
            });
        }

        let distributed = match self.update_rewards(prev, t) {
            Ok(d) => d,
            Err(e) if e.is_clock_regression() => {
                warn!(block_time = t, error = %e, "reward time regression, skipping incentive block");
                return Ok(BlockOutcome::Skipped {
                    block_time: t,
                    last_rewards_time: last,
                });
            }
            Err(e) => return Err(e),
        };
        let transitions = self.advance_programs(t)?;
        Ok(BlockOutcome::Processed {
            block_time: t,
            distributed,
            transitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::incentive::keepers::{MemoryBank, MemoryCollateral};
    use crate::core::state::batch::MemoryKv;

    #[test]
    fn clock_guards() {
        let mut kv = MemoryKv::new();
        let (mut bank, mut col) = (MemoryBank::new(), MemoryCollateral::new());
        let mut k = Keeper::new(&mut kv, &mut bank, &mut col);

        assert!(matches!(k.end_block(-5).unwrap(), BlockOutcome::Skipped { .. }));
        assert_eq!(store::get_last_rewards_time(k.store()).unwrap(), 0);

        assert!(matches!(k.end_block(100).unwrap(), BlockOutcome::Processed { .. }));
        assert_eq!(store::get_last_rewards_time(k.store()).unwrap(), 100);

        assert!(matches!(k.end_block(99).unwrap(), BlockOutcome::Skipped { .. }));
        assert_eq!(store::get_last_rewards_time(k.store()).unwrap(), 100);

        // same time again is processed with nothing elapsed
        assert!(matches!(k.end_block(100).unwrap(), BlockOutcome::Processed { .. }));
    }
}
