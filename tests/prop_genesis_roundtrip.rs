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

use amunchain_incentive::core::incentive::store;
use amunchain_incentive::core::incentive::types::{IncentiveProgram, Params};
use amunchain_incentive::core::incentive::{GenesisState, Msg, MsgResponse};
use common::*;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bond(usize, u64),
    Unbond(usize, u64),
    Emergency(usize, u64),
    Claim(usize),
    Create { start: i64, duration: i64, rewards: u64, valid: bool },
    Tick(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..2, 1u64..400).prop_map(|(a, x)| Op::Bond(a, x)),
        (0usize..2, 1u64..100).prop_map(|(a, x)| Op::Unbond(a, x)),
        (0usize..2, 1u64..100).prop_map(|(a, x)| Op::Emergency(a, x)),
        (0usize..2).prop_map(Op::Claim),
        (1i64..500, 1i64..500, 1u64..100_000, any::<bool>()).prop_map(|(start, duration, rewards, valid)| {
            Op::Create { start, duration, rewards, valid }
        }),
        (0i64..200).prop_map(Op::Tick),
    ]
}

fn run(n: &mut TestNode, ops: Vec<Op>) -> Vec<u32> {
    let accounts = [addr(1), addr(2)];
    let fund = addr(99);
    for a in accounts.iter() {
        deposit(&mut n.app, a, &coin(U_UMEE, 1_000));
    }
    mint(&mut n.app, &fund, &coin(UMEE, 1_000_000));

    let mut ids = Vec::new();
    let mut now = 0;
    for op in ops {
        match op {
            Op::Bond(a, x) => {
                let _ = n.app.deliver(&Msg::Bond { account: accounts[a], u_token: coin(U_UMEE, x) });
            }
            Op::Unbond(a, x) => {
                let _ = n.app.deliver(&Msg::BeginUnbonding { account: accounts[a], u_token: coin(U_UMEE, x) });
            }
            Op::Emergency(a, x) => {
                let _ = n.app.deliver(&Msg::EmergencyUnbond { account: accounts[a], u_token: coin(U_UMEE, x) });
            }
            Op::Claim(a) => {
                let _ = n.app.deliver(&Msg::Claim { account: accounts[a] });
            }
            Op::Create { start, duration, rewards, valid } => {
                let u_token = if valid { U_UMEE } else { "u/xyz" };
                let msg = Msg::GovCreatePrograms {
                    programs: vec![IncentiveProgram::proposed(u_token, now + start, duration, coin(UMEE, rewards))],
                    from_community_fund: true,
                };
                if let Ok(MsgResponse::GovCreatePrograms { ids: created }) = n.app.deliver(&msg) {
                    ids.extend(created);
                }
            }
            Op::Tick(dt) => {
                now += dt;
                n.app.end_block(now).unwrap();
            }
        }
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_genesis_export_import_roundtrip(ops in prop::collection::vec(op(), 1..40)) {
        let mut n = node(Params {
            community_fund_address: Some(addr(99)),
            unbonding_duration: 300,
            ..Params::default()
        });
        run(&mut n, ops);

        let exported = n.app.export_genesis().unwrap();
        exported.validate().unwrap();
        let json = serde_json::to_string(&exported).unwrap();
        let parsed: GenesisState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&parsed, &exported);

        let copy = node_with_genesis(&parsed);
        prop_assert_eq!(copy.app.state_root().unwrap(), n.app.state_root().unwrap());
        prop_assert_eq!(copy.app.export_genesis().unwrap(), exported);
    }

    #[test]
    fn prop_program_ids_unique_and_increasing(ops in prop::collection::vec(op(), 1..40)) {
        let mut n = node(Params {
            community_fund_address: Some(addr(99)),
            ..Params::default()
        });
        let ids = run(&mut n, ops);

        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let next = store::get_next_program_id(n.app.store()).unwrap();
        prop_assert_eq!(next, ids.last().map(|id| id + 1).unwrap_or(1));
        for id in ids.iter() {
            prop_assert_eq!(n.app.querier().program(*id).unwrap().program.id, *id);
        }
    }
}
