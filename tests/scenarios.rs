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

use amunchain_incentive::core::incentive::abci::BlockOutcome;
use amunchain_incentive::core::incentive::bond::bond_summary;
use amunchain_incentive::core::incentive::keepers::{whole_tokens, AssetKeeper, CollateralKeeper};
use amunchain_incentive::core::incentive::store;
use amunchain_incentive::core::incentive::types::{IncentiveProgram, Params, ProgramStatus};
use amunchain_incentive::core::incentive::{IncentiveError, Msg, MsgResponse};
use amunchain_incentive::core::math::{Amount, Dec};
use amunchain_incentive::core::types::Coin;
use common::*;
use std::str::FromStr;

const HALF_YEAR: i64 = 15_778_800;

fn bond(u: u64) -> Coin {
    coin(U_UMEE, u)
}

#[test]
fn single_program_splits_rewards_by_bond() {
    let fund = addr(99);
    let (alice, bob) = (addr(1), addr(2));
    let mut n = node(Params {
        community_fund_address: Some(fund),
        ..Params::default()
    });
    let app = &mut n.app;
    deposit(app, &alice, &bond(100));
    deposit(app, &bob, &bond(50));
    mint(app, &fund, &Coin::new(UMEE, whole_tokens(1000, 6).unwrap()));

    app.deliver(&Msg::Bond { account: alice, u_token: bond(100) }).unwrap();
    app.deliver(&Msg::Bond { account: bob, u_token: bond(50) }).unwrap();
    let resp = app
        .deliver(&Msg::GovCreatePrograms {
            programs: vec![IncentiveProgram::proposed(U_UMEE, 100, 100, coin(UMEE, 10_000_000))],
            from_community_fund: true,
        })
        .unwrap();
    assert_eq!(resp, MsgResponse::GovCreatePrograms { ids: vec![1] });
    assert!(app.querier().program(1).unwrap().program.funded);

    app.end_block(100).unwrap();
    let view = app.querier().program(1).unwrap();
    assert_eq!(view.status, ProgramStatus::Ongoing);
    assert_eq!(view.program.remaining_rewards.amount, Amount::from(10_000_000u64));

    app.end_block(101).unwrap();
    let view = app.querier().program(1).unwrap();
    assert_eq!(view.program.remaining_rewards.amount, Amount::from(9_900_000u64));

    let q = app.querier();
    assert_eq!(q.pending_rewards(&alice).unwrap().amount_of(UMEE), Amount::from(66_666u64));
    assert_eq!(q.pending_rewards(&bob).unwrap().amount_of(UMEE), Amount::from(33_333u64));

    let resp = app.deliver(&Msg::Claim { account: alice }).unwrap();
    let MsgResponse::Claim { amount } = resp else {
        panic!("unexpected response");
    };
    assert_eq!(amount.amount_of(UMEE), Amount::from(66_666u64));
    assert_eq!(app.bank().spendable(&alice).amount_of(UMEE), Amount::from(66_666u64));
    assert!(app.querier().pending_rewards(&alice).unwrap().is_empty());
}

#[test]
fn single_program_splits_four_to_one() {
    let fund = addr(99);
    let (alice, bob) = (addr(1), addr(2));
    let mut n = node(Params {
        community_fund_address: Some(fund),
        ..Params::default()
    });
    let app = &mut n.app;
    deposit(app, &alice, &bond(100));
    deposit(app, &bob, &bond(25));
    mint(app, &fund, &Coin::new(UMEE, whole_tokens(1000, 6).unwrap()));

    app.deliver(&Msg::Bond { account: alice, u_token: bond(100) }).unwrap();
    app.deliver(&Msg::Bond { account: bob, u_token: bond(25) }).unwrap();
    app.deliver(&Msg::GovCreatePrograms {
        programs: vec![IncentiveProgram::proposed(U_UMEE, 100, 100, coin(UMEE, 10_000_000))],
        from_community_fund: true,
    })
    .unwrap();
    app.end_block(100).unwrap();
    app.end_block(101).unwrap();

    let q = app.querier();
    assert_eq!(q.pending_rewards(&alice).unwrap().amount_of(UMEE), Amount::from(80_000u64));
    assert_eq!(q.pending_rewards(&bob).unwrap().amount_of(UMEE), Amount::from(20_000u64));
}

#[test]
fn halted_chain_pays_out_remaining_rewards() {
    let fund = addr(99);
    let alice = addr(1);
    let mut n = node(Params {
        community_fund_address: Some(fund),
        ..Params::default()
    });
    let app = &mut n.app;
    deposit(app, &alice, &bond(100));
    mint(app, &fund, &Coin::new(UMEE, whole_tokens(1000, 6).unwrap()));
    app.deliver(&Msg::Bond { account: alice, u_token: bond(100) }).unwrap();
    app.deliver(&Msg::GovCreatePrograms {
        programs: vec![IncentiveProgram::proposed(U_UMEE, 100, 100, coin(UMEE, 10_000_000))],
        from_community_fund: true,
    })
    .unwrap();

    app.end_block(100).unwrap();
    app.end_block(150).unwrap();
    let view = app.querier().program(1).unwrap();
    assert_eq!(view.status, ProgramStatus::Ongoing);
    assert_eq!(view.program.remaining_rewards.amount, Amount::from(5_000_000u64));

    // the chain resumes long after the program window closed
    let outcome = app.end_block(5_000).unwrap();
    let BlockOutcome::Processed { distributed, transitions, .. } = outcome else {
        panic!("block skipped");
    };
    assert_eq!(distributed.amount_of(UMEE), Amount::from(5_000_000u64));
    assert_eq!(transitions.completed, vec![1]);

    let view = app.querier().program(1).unwrap();
    assert_eq!(view.status, ProgramStatus::Completed);
    assert!(view.program.remaining_rewards.is_zero());
    assert_eq!(
        app.querier().pending_rewards(&alice).unwrap().amount_of(UMEE),
        Amount::from(10_000_000u64)
    );
}

#[test]
fn shorter_unbonding_duration_matures_inflight_unbondings() {
    let alice = addr(1);
    let mut n = node(Params::default());
    let app = &mut n.app;
    deposit(app, &alice, &bond(100));
    app.end_block(1_000).unwrap();
    app.deliver(&Msg::Bond { account: alice, u_token: bond(100) }).unwrap();
    app.deliver(&Msg::BeginUnbonding { account: alice, u_token: bond(40) }).unwrap();

    let s = bond_summary(app.store(), &alice, U_UMEE).unwrap();
    assert_eq!(s.unbondings.len(), 1);
    assert_eq!(s.unbondings[0].end, 1_000 + Params::default().unbonding_duration);
    assert_eq!(store::get_total_unbonding(app.store(), U_UMEE).unwrap(), Amount::from(40u64));

    app.deliver(&Msg::GovSetParams {
        params: Params {
            unbonding_duration: 10,
            ..Params::default()
        },
    })
    .unwrap();
    app.end_block(1_009).unwrap();
    let s = bond_summary(app.store(), &alice, U_UMEE).unwrap();
    assert_eq!(s.unbonding.amount, Amount::from(40u64));

    app.end_block(1_010).unwrap();
    let s = bond_summary(app.store(), &alice, U_UMEE).unwrap();
    assert!(s.unbondings.is_empty());
    assert!(s.unbonding.is_zero());
    assert_eq!(s.bonded.amount, Amount::from(60u64));
    let bonds = app.querier().account_bonds(&alice).unwrap();
    assert!(bonds.iter().all(|b| b.unbondings.is_empty()));
    assert_eq!(
        app.querier().restricted_collateral(&alice, U_UMEE).unwrap(),
        Amount::from(60u64)
    );

    // the next account message clears the stored unbonding
    app.deliver(&Msg::Claim { account: alice }).unwrap();
    assert!(store::get_total_unbonding(app.store(), U_UMEE).unwrap().is_zero());
    assert!(store::get_unbondings(app.store(), &alice, U_UMEE).unwrap().is_empty());
    app.withdraw_collateral(&alice, &bond(40)).unwrap();
}

#[test]
fn overlapping_programs_sum_into_current_rates() {
    let fund = addr(99);
    let whale = addr(1);
    let mut n = node(Params {
        community_fund_address: Some(fund),
        ..Params::default()
    });
    let app = &mut n.app;
    deposit(app, &whale, &bond(100_000_000));
    mint(app, &fund, &coin(UMEE, 40_000_001));
    mint(app, &fund, &coin(ATOM, 10_000_001));
    app.deliver(&Msg::Bond { account: whale, u_token: bond(100_000_000) }).unwrap();
    app.deliver(&Msg::GovCreatePrograms {
        programs: vec![
            IncentiveProgram::proposed(U_UMEE, 100, HALF_YEAR, coin(UMEE, 10_000_000)),
            IncentiveProgram::proposed(U_UMEE, 120, HALF_YEAR, coin(UMEE, 30_000_000)),
            IncentiveProgram::proposed(U_UMEE, 140, HALF_YEAR, coin(ATOM, 10_000_000)),
        ],
        from_community_fund: true,
    })
    .unwrap();
    for id in 1..=3 {
        assert!(app.querier().program(id).unwrap().program.funded, "program {id} funded");
    }

    app.end_block(100).unwrap();
    let rates = app.querier().current_rates(U_UMEE).unwrap();
    assert_eq!(rates.reference_bond, bond(1_000_000));
    assert_eq!(rates.rewards.amount_of(UMEE), Amount::from(200_000u64));
    assert!(rates.rewards.amount_of(ATOM).is_zero());

    app.end_block(120).unwrap();
    let rates = app.querier().current_rates(U_UMEE).unwrap();
    assert_eq!(rates.rewards.amount_of(UMEE), Amount::from(800_000u64));

    app.end_block(140).unwrap();
    let rates = app.querier().current_rates(U_UMEE).unwrap();
    assert_eq!(rates.rewards.amount_of(UMEE), Amount::from(800_000u64));
    assert_eq!(rates.rewards.amount_of(ATOM), Amount::from(200_000u64));

    // 0.8 umee at 0.5 + 0.2 atom at 10, over 1 umee at 0.5
    let actual = app.querier().actual_rates(U_UMEE).unwrap();
    assert_eq!(actual.apy, Dec::from_str("4.8").unwrap());
}

#[test]
fn current_rates_empty_without_bonds() {
    let n = node(Params::default());
    let rates = n.app.querier().current_rates(U_UMEE).unwrap();
    assert!(rates.rewards.is_empty());
    assert!(n.app.querier().actual_rates(U_UMEE).unwrap().apy.is_zero());
}

#[test]
fn emergency_unbond_donates_floor_of_fee() {
    let alice = addr(1);
    let mut n = node(Params::default());
    let app = &mut n.app;
    deposit(app, &alice, &bond(150));

    app.deliver(&Msg::Bond { account: alice, u_token: bond(50) }).unwrap();
    let resp = app
        .deliver(&Msg::EmergencyUnbond { account: alice, u_token: bond(50) })
        .unwrap();
    assert_eq!(resp, MsgResponse::EmergencyUnbond { fee: bond(0) });
    assert!(app.collateral().donated().is_empty());
    let s = bond_summary(app.store(), &alice, U_UMEE).unwrap();
    assert!(s.bonded.is_zero());
    assert!(s.unbondings.is_empty());

    app.deliver(&Msg::Bond { account: alice, u_token: bond(100) }).unwrap();
    let resp = app
        .deliver(&Msg::EmergencyUnbond { account: alice, u_token: bond(100) })
        .unwrap();
    assert_eq!(resp, MsgResponse::EmergencyUnbond { fee: bond(1) });
    assert_eq!(app.collateral().donated().amount_of(U_UMEE), Amount::from(1u64));
    assert_eq!(app.collateral().reserves().amount_of(UMEE), Amount::from(1u64));
    assert_eq!(app.collateral().collateral(&alice, U_UMEE).amount, Amount::from(149u64));
    assert!(store::get_total_bonded(app.store(), U_UMEE).unwrap().is_zero());
    assert!(store::get_total_unbonding(app.store(), U_UMEE).unwrap().is_zero());
}

#[test]
fn unfunded_program_completes_at_start() {
    let fund = addr(99);
    let alice = addr(1);
    let mut n = node(Params {
        community_fund_address: Some(fund),
        ..Params::default()
    });
    let app = &mut n.app;
    deposit(app, &alice, &bond(10));
    app.deliver(&Msg::Bond { account: alice, u_token: bond(10) }).unwrap();
    app.deliver(&Msg::GovCreatePrograms {
        programs: vec![IncentiveProgram::proposed(U_UMEE, 50, 100, coin(UMEE, 1_000))],
        from_community_fund: true,
    })
    .unwrap();
    assert!(!app.querier().program(1).unwrap().program.funded);

    let outcome = app.end_block(50).unwrap();
    let BlockOutcome::Processed { transitions, distributed, .. } = outcome else {
        panic!("block skipped");
    };
    assert_eq!(transitions.cancelled, vec![1]);
    assert!(transitions.started.is_empty());
    assert!(distributed.is_empty());

    let view = app.querier().program(1).unwrap();
    assert_eq!(view.status, ProgramStatus::Completed);
    assert!(view.program.remaining_rewards.is_zero());
    assert!(!view.program.funded);

    app.end_block(60).unwrap();
    assert!(store::get_accumulator(app.store(), U_UMEE).unwrap().rewards.is_empty());
    assert!(app.querier().pending_rewards(&alice).unwrap().is_empty());
}

#[test]
fn sponsor_requires_exact_rewards_once() {
    let sponsor = addr(7);
    let mut n = node(Params::default());
    let app = &mut n.app;
    mint(app, &sponsor, &coin(UMEE, 20));
    mint(app, &sponsor, &coin(ATOM, 10));
    app.deliver(&Msg::GovCreatePrograms {
        programs: vec![IncentiveProgram::proposed(U_UMEE, 1_000, 100, coin(UMEE, 10))],
        from_community_fund: false,
    })
    .unwrap();

    let offer = |asset: Coin| Msg::Sponsor { sponsor, program: 1, asset };
    assert!(matches!(app.deliver(&offer(coin(UMEE, 5))), Err(IncentiveError::SponsorInvalid(_))));
    assert!(matches!(app.deliver(&offer(coin(ATOM, 10))), Err(IncentiveError::SponsorInvalid(_))));
    assert_eq!(app.deliver(&offer(coin(UMEE, 10))).unwrap(), MsgResponse::Sponsor);
    assert!(matches!(app.deliver(&offer(coin(UMEE, 10))), Err(IncentiveError::SponsorIneligible(_))));

    let view = app.querier().program(1).unwrap();
    assert!(view.program.funded);
    assert_eq!(view.program.remaining_rewards, coin(UMEE, 10));
    assert_eq!(app.bank().spendable(&sponsor).amount_of(UMEE), Amount::from(10u64));
    assert_eq!(app.bank().module_balance().amount_of(UMEE), Amount::from(10u64));

    assert!(matches!(
        app.deliver(&Msg::Sponsor { sponsor, program: 9, asset: coin(UMEE, 10) }),
        Err(IncentiveError::NotFound(_))
    ));
}

#[test]
fn max_unbondings_relaxed_once_matured() {
    let alice = addr(1);
    let params = Params {
        max_unbondings: 5,
        ..Params::default()
    };
    let duration = params.unbonding_duration;
    let mut n = node(params);
    let app = &mut n.app;
    deposit(app, &alice, &bond(10));
    app.end_block(1_000).unwrap();
    app.deliver(&Msg::Bond { account: alice, u_token: bond(10) }).unwrap();

    let unbond = Msg::BeginUnbonding { account: alice, u_token: bond(1) };
    for _ in 0..5 {
        app.deliver(&unbond).unwrap();
    }
    assert!(matches!(app.deliver(&unbond), Err(IncentiveError::MaxUnbondings(5))));
    assert_eq!(store::get_total_unbonding(app.store(), U_UMEE).unwrap(), Amount::from(5u64));

    app.end_block(1_000 + duration).unwrap();
    app.deliver(&unbond).unwrap();

    let bonds = app.querier().account_bonds(&alice).unwrap();
    assert_eq!(bonds.len(), 1);
    assert_eq!(bonds[0].bonded, bond(4));
    assert_eq!(bonds[0].unbonding, bond(1));
    assert_eq!(bonds[0].unbondings.len(), 1);
    assert_eq!(store::get_total_unbonding(app.store(), U_UMEE).unwrap(), Amount::from(1u64));
}
