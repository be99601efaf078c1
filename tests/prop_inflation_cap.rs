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

use amunchain_incentive::core::economics::inflation::{Calculator, InflationParams, MintParams, Minter};
use amunchain_incentive::core::math::bp::FixedBP;
use amunchain_incentive::core::math::{Amount, Dec};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_block_mint_within_max_supply(
        supply in 1u64..1_000_000_000_000,
        max_supply in 1u64..1_000_000_000_000,
        inflation_pct in 0u64..100,
        bonded_pct in 0u64..100,
        blocks_per_year in 1u64..10_000_000,
        reduction in 0u32..10_000,
        now in 0i64..1_000,
        cycle_end in 0i64..1_000,
    ) {
        let calc = Calculator::new(InflationParams {
            max_supply: Amount::from(max_supply),
            inflation_cycle: 500,
            inflation_reduction_rate: FixedBP::new(reduction).unwrap(),
        });
        let mut minter = Minter {
            inflation: Dec::percent(inflation_pct),
            ..Minter::default()
        };
        let mut mint = MintParams {
            blocks_per_year,
            ..MintParams::default()
        };
        let mut cycle_end = cycle_end;
        let out = calc
            .block_mint(now, Amount::from(supply), Dec::percent(bonded_pct), &mut minter, &mut mint, &mut cycle_end)
            .unwrap();

        let gap = Amount::from(max_supply).saturating_sub(Amount::from(supply));
        prop_assert!(out.minted <= gap);
        prop_assert!(mint.inflation_min <= mint.inflation_max);
        if supply >= max_supply {
            prop_assert!(out.minted.is_zero());
        }
    }
}
