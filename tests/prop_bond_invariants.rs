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

mod common;

use amunchain_incentive::core::app::App;
use amunchain_incentive::core::incentive::bond::bond_summary;
use amunchain_incentive::core::incentive::keepers::CollateralKeeper;
use amunchain_incentive::core::incentive::store;
use amunchain_incentive::core::incentive::types::Params;
use amunchain_incentive::core::incentive::Msg;
use amunchain_incentive::core::math::Amount;
use amunchain_incentive::core::types::Address;
use common::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

const MAX_UNBONDINGS: u32 = 3;

#[derive(Clone, Debug)]
enum Op {
    Bond(usize, u64),
    Unbond(usize, u64),
    Emergency(usize, u64),
    Claim(usize),
    Liquidate(usize, u64),
    Tick(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u64..300).prop_map(|(a, x)| Op::Bond(a, x)),
        (0usize..3, 1u64..100).prop_map(|(a, x)| Op::Unbond(a, x)),
        (0usize..3, 1u64..150).prop_map(|(a, x)| Op::Emergency(a, x)),
        (0usize..3).prop_map(Op::Claim),
        (0usize..3, 1u64..100).prop_map(|(a, x)| Op::Liquidate(a, x)),
        (0i64..60_000).prop_map(Op::Tick),
    ]
}

fn apply(app: &mut App, accounts: &[Address], now: &mut i64, op: Op) {
    match op {
        Op::Bond(a, x) => {
            let _ = app.deliver(&Msg::Bond { account: accounts[a], u_token: coin(U_UMEE, x) });
        }
        Op::Unbond(a, x) => {
            let _ = app.deliver(&Msg::BeginUnbonding { account: accounts[a], u_token: coin(U_UMEE, x) });
        }
        Op::Emergency(a, x) => {
            let _ = app.deliver(&Msg::EmergencyUnbond { account: accounts[a], u_token: coin(U_UMEE, x) });
        }
        Op::Claim(a) => {
            let _ = app.deliver(&Msg::Claim { account: accounts[a] });
        }
        Op::Liquidate(a, x) => {
            let _ = app.liquidate(&accounts[a], &coin(U_UMEE, x));
        }
        Op::Tick(dt) => {
            *now += dt;
            app.end_block(*now).unwrap();
        }
    }
}

fn check(app: &App, accounts: &[Address]) -> Result<(), TestCaseError> {
    let mut bonded_sum = Amount::zero();
    let mut unbonding_sum = Amount::zero();
    for a in accounts.iter() {
        let s = bond_summary(app.store(), a, U_UMEE).unwrap();
        let collateral = app.collateral().collateral(a, U_UMEE).amount;
        prop_assert!(collateral >= s.bonded.amount + s.unbonding.amount);
        prop_assert!(s.unbondings.len() <= MAX_UNBONDINGS as usize);

        bonded_sum += store::get_bonded(app.store(), a, U_UMEE).unwrap();
        for u in store::get_unbondings(app.store(), a, U_UMEE).unwrap() {
            unbonding_sum += u.u_token.amount;
        }
    }
    prop_assert_eq!(store::get_total_bonded(app.store(), U_UMEE).unwrap(), bonded_sum);
    prop_assert_eq!(store::get_total_unbonding(app.store(), U_UMEE).unwrap(), unbonding_sum);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_bond_accounting_holds(ops in prop::collection::vec(op(), 1..40)) {
        let mut n = node(Params {
            max_unbondings: MAX_UNBONDINGS,
            unbonding_duration: 100_000,
            ..Params::default()
        });
        let accounts = [addr(1), addr(2), addr(3)];
        for a in accounts.iter() {
            deposit(&mut n.app, a, &coin(U_UMEE, 500));
        }

        let mut now = 1;
        n.app.end_block(now).unwrap();
        for op in ops {
            apply(&mut n.app, &accounts, &mut now, op);
            check(&n.app, &accounts)?;
        }
    }
}
