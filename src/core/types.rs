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

//! Deterministic core types and canonical encoding helpers.

use crate::core::math::{self, Amount, Dec, MathError};
use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical serialization error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
}

/// Hard cap for any single stored value.
pub const MAX_VALUE_BYTES: usize = 1 << 20;

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding provides a stable integer representation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Requires deterministic container ordering (use BTreeMap/BTreeSet).
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// Prefix carried by every uToken denom.
pub const UTOKEN_PREFIX: &str = "u/";

/// Denom validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DenomError {
    #[error("invalid denom: {0}")]
    Invalid(String),
    #[error("denom is not a uToken: {0}")]
    NotUToken(String),
    #[error("denom is a uToken: {0}")]
    UToken(String),
}

/// True if `denom` carries the uToken prefix.
pub fn has_utoken_prefix(denom: &str) -> bool {
    denom.starts_with(UTOKEN_PREFIX)
}

/// `u/<denom>` for a base denom.
pub fn to_utoken_denom(base: &str) -> Result<String, DenomError> {
    if has_utoken_prefix(base) {
        return Err(DenomError::UToken(base.to_string()));
    }
    Ok(format!("{UTOKEN_PREFIX}{base}"))
}

/// Base denom of a uToken denom.
pub fn to_token_denom(u_denom: &str) -> Result<&str, DenomError> {
    match u_denom.strip_prefix(UTOKEN_PREFIX) {
        Some(base) if !base.is_empty() && !has_utoken_prefix(base) => Ok(base),
        _ => Err(DenomError::NotUToken(u_denom.to_string())),
    }
}

/// Syntactic denom check: ASCII letter first, then `[a-zA-Z0-9/:._-]`, 3..=128 chars.
pub fn validate_denom(denom: &str) -> Result<(), DenomError> {
    let ok_len = (3..=128).contains(&denom.len());
    let mut chars = denom.chars();
    let ok_first = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let ok_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if ok_len && ok_first && ok_rest {
        Ok(())
    } else {
        Err(DenomError::Invalid(denom.to_string()))
    }
}

/// A valid uToken denom: syntactically valid, prefixed once, never `u/u/...`.
pub fn validate_utoken_denom(denom: &str) -> Result<(), DenomError> {
    validate_denom(denom)?;
    to_token_denom(denom).map(|_| ())
}

/// A valid base (non-uToken) denom.
pub fn validate_base_denom(denom: &str) -> Result<(), DenomError> {
    validate_denom(denom)?;
    if has_utoken_prefix(denom) {
        return Err(DenomError::UToken(denom.to_string()));
    }
    Ok(())
}

/// Width of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Address parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("invalid address encoding")]
    Encoding,
    #[error("invalid address length {0}")]
    Length(usize),
}

/// Fixed-width account identifier, base58 in human form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Construct from raw bytes.
    pub fn from_bytes(b: [u8; ADDRESS_LEN]) -> Self {
        Self(b)
    }

    /// Return bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Construct from a byte slice of the exact width.
    pub fn from_slice(b: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LEN] = b.try_into().map_err(|_| AddressError::Length(b.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AddressError::Empty);
        }
        let raw = bs58::decode(s).into_vec().map_err(|_| AddressError::Encoding)?;
        Address::from_slice(&raw)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A token amount of a single denom.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    /// Denom.
    pub denom: String,
    /// Amount.
    pub amount: Amount,
}

impl Coin {
    /// New coin.
    pub fn new(denom: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    /// Zero of a denom.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, Amount::zero())
    }

    /// True if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Coin parse error.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid coin: {0}")]
pub struct ParseCoinError(pub String);

impl FromStr for Coin {
    type Err = ParseCoinError;

    /// Parses `<amount><denom>`, e.g. `100u/umee`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ParseCoinError(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        let amount = Amount::from_str(amount).map_err(|_| ParseCoinError(s.to_string()))?;
        validate_denom(denom).map_err(|_| ParseCoinError(s.to_string()))?;
        Ok(Coin::new(denom, amount))
    }
}

/// A decimal amount of a single denom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    /// Denom.
    pub denom: String,
    /// Amount.
    pub amount: Dec,
}

/// Sorted set of coins keyed by denom. Zero amounts are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(BTreeMap<String, Amount>);

impl Coins {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding one coin (empty if the coin is zero).
    pub fn from_coin(c: Coin) -> Self {
        let mut out = Self::new();
        if !c.amount.is_zero() {
            out.0.insert(c.denom, c.amount);
        }
        out
    }

    /// Amount of a denom (zero if absent).
    pub fn amount_of(&self, denom: &str) -> Amount {
        self.0.get(denom).copied().unwrap_or_default()
    }

    /// True if no coins are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a coin in place.
    pub fn add(&mut self, c: &Coin) -> Result<(), MathError> {
        if c.amount.is_zero() {
            return Ok(());
        }
        let cur = self.amount_of(&c.denom);
        self.0.insert(c.denom.clone(), math::add(cur, c.amount)?);
        Ok(())
    }

    /// Add another set in place.
    pub fn add_all(&mut self, other: &Coins) -> Result<(), MathError> {
        for c in other.iter() {
            self.add(&c)?;
        }
        Ok(())
    }

    /// Subtract a coin in place; fails if the result would be negative.
    pub fn sub(&mut self, c: &Coin) -> Result<(), MathError> {
        if c.amount.is_zero() {
            return Ok(());
        }
        let left = math::sub(self.amount_of(&c.denom), c.amount)?;
        if left.is_zero() {
            self.0.remove(&c.denom);
        } else {
            self.0.insert(c.denom.clone(), left);
        }
        Ok(())
    }

    /// True if this set holds at least `c`.
    pub fn covers(&self, c: &Coin) -> bool {
        self.amount_of(&c.denom) >= c.amount
    }

    /// Coins in denom order.
    pub fn iter(&self) -> impl Iterator<Item = Coin> + '_ {
        self.0.iter().map(|(d, a)| Coin::new(d.clone(), *a))
    }

    /// Number of denoms held.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromIterator<Coin> for Coins {
    /// Zero coins are dropped; amounts of repeated denoms saturate on overflow.
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        let mut out = Coins::new();
        for c in iter {
            if c.amount.is_zero() {
                continue;
            }
            let cur = out.amount_of(&c.denom);
            out.0.insert(c.denom, cur.saturating_add(c.amount));
        }
        out
    }
}

/// Sorted set of decimal coins keyed by denom. Zero amounts are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecCoins(BTreeMap<String, Dec>);

impl DecCoins {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount of a denom (zero if absent).
    pub fn amount_of(&self, denom: &str) -> Dec {
        self.0.get(denom).copied().unwrap_or_default()
    }

    /// True if no coins are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `amount` of `denom` in place.
    pub fn add(&mut self, denom: &str, amount: Dec) -> Result<(), MathError> {
        if amount.is_zero() {
            return Ok(());
        }
        let next = self
            .amount_of(denom)
            .checked_add(amount)
            .map_err(|_| MathError::Overflow)?;
        self.0.insert(denom.to_string(), next);
        Ok(())
    }

    /// Component-wise `self - other`. Any negative component is an error.
    pub fn checked_sub(&self, other: &DecCoins) -> Result<DecCoins, MathError> {
        let mut out = self.clone();
        for (denom, amount) in other.0.iter() {
            let left = out
                .amount_of(denom)
                .checked_sub(*amount)
                .map_err(|_| MathError::Underflow)?;
            if left.is_zero() {
                out.0.remove(denom);
            } else {
                out.0.insert(denom.clone(), left);
            }
        }
        Ok(out)
    }

    /// True if every component of `self` is at least the matching component of `other`.
    pub fn dominates(&self, other: &DecCoins) -> bool {
        other.0.iter().all(|(d, a)| self.amount_of(d) >= *a)
    }

    /// Decimal coins in denom order.
    pub fn iter(&self) -> impl Iterator<Item = DecCoin> + '_ {
        self.0.iter().map(|(d, a)| DecCoin {
            denom: d.clone(),
            amount: *a,
        })
    }

    /// Denoms held.
    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denom_helpers() {
        assert_eq!(to_token_denom("u/umee").unwrap(), "umee");
        assert!(to_token_denom("umee").is_err());
        assert!(to_token_denom("u/u/umee").is_err());
        assert!(to_token_denom("u/").is_err());
        assert_eq!(to_utoken_denom("uatom").unwrap(), "u/uatom");
        assert!(to_utoken_denom("u/uatom").is_err());
        assert!(validate_utoken_denom("u/umee").is_ok());
        assert!(validate_base_denom("u/umee").is_err());
        assert!(validate_denom("1abc").is_err());
        assert!(validate_denom("ab").is_err());
    }

    #[test]
    fn address_text_roundtrip() {
        let a = Address::from_bytes([7u8; ADDRESS_LEN]);
        let parsed: Address = a.to_string().parse().unwrap();
        assert_eq!(a, parsed);
        assert_eq!("".parse::<Address>(), Err(AddressError::Empty));
        assert!(matches!("1111".parse::<Address>(), Err(AddressError::Length(_))));
    }

    #[test]
    fn coins_keep_no_zeroes() {
        let mut c = Coins::new();
        c.add(&Coin::new("umee", 5u64)).unwrap();
        c.add(&Coin::zero("uatom")).unwrap();
        assert_eq!(c.len(), 1);
        c.sub(&Coin::new("umee", 5u64)).unwrap();
        assert!(c.is_empty());
        assert!(c.sub(&Coin::new("umee", 1u64)).is_err());
    }

    #[test]
    fn dec_coins_sub_detects_negative() {
        let mut a = DecCoins::new();
        a.add("umee", Dec::percent(50)).unwrap();
        let mut b = DecCoins::new();
        b.add("umee", Dec::percent(20)).unwrap();
        let d = a.checked_sub(&b).unwrap();
        assert_eq!(d.amount_of("umee"), Dec::percent(30));
        assert!(b.checked_sub(&a).is_err());
        b.add("uatom", Dec::one()).unwrap();
        assert!(a.checked_sub(&b).is_err());
    }

    #[test]
    fn coin_parse() {
        let c: Coin = "100u/umee".parse().unwrap();
        assert_eq!(c, Coin::new("u/umee", 100u64));
        assert!("u/umee".parse::<Coin>().is_err());
    }

    #[test]
    fn canonical_codec_roundtrip_and_cap() {
        let c = Coin::new("umee", 42u64);
        let bz = encode_canonical(&c).unwrap();
        let back: Coin = decode_canonical_limited(&bz, MAX_VALUE_BYTES).unwrap();
        assert_eq!(c, back);
        assert!(matches!(
            decode_canonical_limited::<Coin>(&bz, 2),
            Err(CodecError::TooLarge)
        ));
    }
}
