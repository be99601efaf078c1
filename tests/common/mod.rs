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

#![allow(dead_code)]

use amunchain_incentive::core::app::App;
use amunchain_incentive::core::incentive::keepers::{MemoryBank, MemoryCollateral, StaticOracle};
use amunchain_incentive::core::incentive::types::Params;
use amunchain_incentive::core::incentive::GenesisState;
use amunchain_incentive::core::math::Dec;
use amunchain_incentive::core::state::persistent_state::PersistentState;
use amunchain_incentive::core::types::{Address, Coin, ADDRESS_LEN};
use tempfile::TempDir;

pub const UMEE: &str = "umee";
pub const ATOM: &str = "atom";
pub const U_UMEE: &str = "u/umee";
pub const U_ATOM: &str = "u/atom";

pub fn addr(n: u8) -> Address {
    Address::from_bytes([n; ADDRESS_LEN])
}

pub fn coin(denom: &str, amount: u64) -> Coin {
    Coin::new(denom, amount)
}

/// umee at 0.5 USD and atom at 10 USD, both with 6 decimals.
pub fn collaborators() -> (MemoryBank, MemoryCollateral, StaticOracle) {
    let mut collateral = MemoryCollateral::new();
    collateral.register_token(UMEE, 6);
    collateral.register_token(ATOM, 6);
    let mut oracle = StaticOracle::new();
    oracle.set_price(UMEE, Dec::percent(50), 6);
    oracle.set_price(ATOM, Dec::from_atomics(10u128, 0).unwrap(), 6);
    (MemoryBank::new(), collateral, oracle)
}

/// App over a sled store in its own temp dir. Keep the dir alive with the app.
pub struct TestNode {
    pub app: App,
    pub dir: TempDir,
}

pub fn open_app(dir: &TempDir) -> App {
    let state = PersistentState::open(dir.path().to_str().unwrap()).unwrap();
    let (bank, collateral, oracle) = collaborators();
    App::new(state, bank, collateral, oracle)
}

pub fn node_with_genesis(g: &GenesisState) -> TestNode {
    let dir = tempfile::tempdir().unwrap();
    let mut app = open_app(&dir);
    app.init_genesis(g).unwrap();
    TestNode { app, dir }
}

pub fn node(params: Params) -> TestNode {
    node_with_genesis(&GenesisState {
        params,
        ..GenesisState::default()
    })
}

pub fn deposit(app: &mut App, who: &Address, u_coin: &Coin) {
    app.collateral_mut().deposit(who, u_coin).unwrap();
}

pub fn mint(app: &mut App, who: &Address, c: &Coin) {
    app.bank_mut().mint(who, c).unwrap();
}
