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

//! Collaborator contracts consumed by the incentive engine, plus the
//! in-process implementations used by the node and the tests.
//!
//! The engine never owns token balances or collateral. It moves reward
//! tokens through an [`AssetKeeper`], reads collateral and donates penalties
//! through a [`CollateralKeeper`], and prices rates through a [`ValueOracle`].

use crate::core::math::{self, Amount, Dec, MathError};
use crate::core::types::{to_token_denom, Address, Coin, Coins};
use std::collections::BTreeMap;
use thiserror::Error;

/// Collaborator errors. Propagated unchanged through the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeeperError {
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: String, need: String },
    #[error("token not registered: {0}")]
    UnknownToken(String),
    #[error("not a uToken: {0}")]
    NotUToken(String),
    #[error("missing price: {0}")]
    MissingPrice(String),
    #[error("math: {0}")]
    Math(#[from] MathError),
}

/// Price selection for oracle valuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceMode {
    /// Latest price.
    Spot,
    /// Historic median price.
    Historic,
}

/// Moves tokens between accounts and the incentive module account.
pub trait AssetKeeper {
    /// Coins `addr` can spend right now.
    fn spendable(&self, addr: &Address) -> Coins;
    /// Move `coins` from `from` into the module account.
    fn transfer_to_module(&mut self, from: &Address, coins: &Coins) -> Result<(), KeeperError>;
    /// Move `coins` from the module account to `to`.
    fn transfer_to_account(&mut self, to: &Address, coins: &Coins) -> Result<(), KeeperError>;
}

/// Custodian of the collateral ledger.
pub trait CollateralKeeper {
    /// Collateral of `addr` in uToken denom `u_denom` (zero coin if none).
    fn collateral(&self, addr: &Address, u_denom: &str) -> Coin;
    /// Burn `u_coin` of `addr`'s collateral and add its base equivalent to reserves.
    fn donate(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), KeeperError>;
    /// Base-token equivalent of a uToken amount.
    fn to_base_token(&self, u_coin: &Coin) -> Result<Coin, KeeperError>;
    /// Decimal exponent of a registered base token.
    fn token_exponent(&self, base_denom: &str) -> Result<u32, KeeperError>;
}

/// Token valuation.
pub trait ValueOracle {
    /// Summed USD value of `coins`.
    fn total_token_value(&self, coins: &Coins, mode: PriceMode) -> Result<Dec, KeeperError>;
}

fn debit(balance: &mut Coins, coins: &Coins) -> Result<(), KeeperError> {
    let mut next = balance.clone();
    for c in coins.iter() {
        next.sub(&c).map_err(|_| KeeperError::InsufficientFunds {
            have: balance.to_string(),
            need: coins.to_string(),
        })?;
    }
    *balance = next;
    Ok(())
}

/// In-memory bank with a single module account.
#[derive(Clone, Debug, Default)]
pub struct MemoryBank {
    balances: BTreeMap<Address, Coins>,
    module: Coins,
}

impl MemoryBank {
    /// Empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit newly created coins to `addr`.
    pub fn mint(&mut self, addr: &Address, coin: &Coin) -> Result<(), KeeperError> {
        self.balances.entry(*addr).or_default().add(coin)?;
        Ok(())
    }

    /// Balance of `addr`.
    pub fn balance(&self, addr: &Address) -> Coins {
        self.balances.get(addr).cloned().unwrap_or_default()
    }

    /// Balance of the incentive module account.
    pub fn module_balance(&self) -> &Coins {
        &self.module
    }
}

impl AssetKeeper for MemoryBank {
    fn spendable(&self, addr: &Address) -> Coins {
        self.balance(addr)
    }

    fn transfer_to_module(&mut self, from: &Address, coins: &Coins) -> Result<(), KeeperError> {
        let balance = self.balances.entry(*from).or_default();
        debit(balance, coins)?;
        self.module.add_all(coins)?;
        Ok(())
    }

    fn transfer_to_account(&mut self, to: &Address, coins: &Coins) -> Result<(), KeeperError> {
        debit(&mut self.module, coins)?;
        self.balances.entry(*to).or_default().add_all(coins)?;
        Ok(())
    }
}

/// In-memory collateral ledger. uTokens convert 1:1 to base tokens.
#[derive(Clone, Debug, Default)]
pub struct MemoryCollateral {
    collateral: BTreeMap<Address, Coins>,
    exponents: BTreeMap<String, u32>,
    reserves: Coins,
    donated: Coins,
}

impl MemoryCollateral {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base token and its decimal exponent.
    pub fn register_token(&mut self, base_denom: impl Into<String>, exponent: u32) {
        self.exponents.insert(base_denom.into(), exponent);
    }

    /// Add collateral for `addr`.
    pub fn deposit(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), KeeperError> {
        to_token_denom(&u_coin.denom).map_err(|_| KeeperError::NotUToken(u_coin.denom.clone()))?;
        self.collateral.entry(*addr).or_default().add(u_coin)?;
        Ok(())
    }

    /// Remove collateral from `addr` without any restriction check.
    pub fn remove(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), KeeperError> {
        let held = self.collateral.entry(*addr).or_default();
        debit(held, &Coins::from_coin(u_coin.clone()))
    }

    /// Base tokens added to reserves by donations.
    pub fn reserves(&self) -> &Coins {
        &self.reserves
    }

    /// uTokens burned by donations.
    pub fn donated(&self) -> &Coins {
        &self.donated
    }
}

impl CollateralKeeper for MemoryCollateral {
    fn collateral(&self, addr: &Address, u_denom: &str) -> Coin {
        let amount = self
            .collateral
            .get(addr)
            .map(|c| c.amount_of(u_denom))
            .unwrap_or_default();
        Coin::new(u_denom, amount)
    }

    fn donate(&mut self, addr: &Address, u_coin: &Coin) -> Result<(), KeeperError> {
        if u_coin.is_zero() {
            return Ok(());
        }
        let base = self.to_base_token(u_coin)?;
        self.remove(addr, u_coin)?;
        self.donated.add(u_coin)?;
        self.reserves.add(&base)?;
        Ok(())
    }

    fn to_base_token(&self, u_coin: &Coin) -> Result<Coin, KeeperError> {
        let base = to_token_denom(&u_coin.denom)
            .map_err(|_| KeeperError::NotUToken(u_coin.denom.clone()))?;
        Ok(Coin::new(base, u_coin.amount))
    }

    fn token_exponent(&self, base_denom: &str) -> Result<u32, KeeperError> {
        self.exponents
            .get(base_denom)
            .copied()
            .ok_or_else(|| KeeperError::UnknownToken(base_denom.to_string()))
    }
}

/// Fixed USD prices per whole token (`10^exponent` base units).
#[derive(Clone, Debug, Default)]
pub struct StaticOracle {
    prices: BTreeMap<String, (Dec, u32)>,
}

impl StaticOracle {
    /// Empty oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price of one whole `base_denom`.
    pub fn set_price(&mut self, base_denom: impl Into<String>, price: Dec, exponent: u32) {
        self.prices.insert(base_denom.into(), (price, exponent));
    }
}

impl ValueOracle for StaticOracle {
    fn total_token_value(&self, coins: &Coins, _mode: PriceMode) -> Result<Dec, KeeperError> {
        let mut total = Dec::zero();
        for c in coins.iter() {
            let (price, exponent) = self
                .prices
                .get(&c.denom)
                .copied()
                .ok_or_else(|| KeeperError::MissingPrice(c.denom.clone()))?;
            let whole = math::dec_from_ratio(c.amount, math::pow10(exponent)?)?;
            let value = whole.checked_mul(price).map_err(|_| MathError::Overflow)?;
            total = total.checked_add(value).map_err(|_| MathError::Overflow)?;
        }
        Ok(total)
    }
}

/// Amount helper used by tests and the node to express whole-token amounts.
pub fn whole_tokens(n: u64, exponent: u32) -> Result<Amount, MathError> {
    Amount::from(n)
        .checked_mul(math::pow10(exponent)?)
        .map_err(|_| MathError::Overflow)
}
