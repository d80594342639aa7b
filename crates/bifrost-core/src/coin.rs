use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::asset::Asset;
use crate::error::CoreError;

// ── Amount text form ─────────────────────────────────────────────────────────

/// Amounts travel as base-10 strings so JSON consumers never lose precision.
pub(crate) mod amount_str {
    use num_bigint::BigUint;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(d)?;
        super::parse_amount(&text).map_err(D::Error::custom)
    }

    pub mod option {
        use num_bigint::BigUint;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(amount: &Option<BigUint>, s: S) -> Result<S::Ok, S::Error> {
            match amount {
                Some(v) => s.serialize_some(&v.to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigUint>, D::Error> {
            let text = Option::<String>::deserialize(d)?;
            text.map(|t| super::super::parse_amount(&t).map_err(D::Error::custom))
                .transpose()
        }
    }
}

pub fn parse_amount(text: &str) -> Result<BigUint, CoreError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidAmount(text.to_string()));
    }
    BigUint::from_str(text).map_err(|_| CoreError::InvalidAmount(text.to_string()))
}

/// `a - b`, or zero when `b > a`.
pub fn safe_sub(a: &BigUint, b: &BigUint) -> BigUint {
    if b >= a {
        BigUint::default()
    } else {
        a - b
    }
}

fn is_zero(amount: &BigUint) -> bool {
    *amount == BigUint::default()
}

// ── Coin ─────────────────────────────────────────────────────────────────────

/// An amount of one asset. Amounts are unsigned and unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coin {
    pub asset: Asset,
    #[serde(with = "amount_str")]
    pub amount: BigUint,
    /// Decimals of the asset on its source chain, 0 when unknown.
    #[serde(default)]
    pub decimals: i64,
}

impl Coin {
    pub fn new(asset: Asset, amount: impl Into<BigUint>) -> Self {
        Self {
            asset,
            amount: amount.into(),
            decimals: 0,
        }
    }

    pub fn with_decimals(mut self, decimals: i64) -> Self {
        self.decimals = decimals;
        self
    }

    /// Parse the `"<amount> <ASSET>"` text form.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let mut parts = input.split_whitespace();
        let (Some(amount), Some(asset), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoreError::InvalidCoin {
                input: input.to_string(),
                reason: "expected \"<amount> <asset>\"".into(),
            });
        };
        Ok(Self::new(Asset::new(asset)?, parse_amount(amount)?))
    }

    pub fn is_zero(&self) -> bool {
        is_zero(&self.amount)
    }

    pub fn is_empty(&self) -> bool {
        self.asset.is_empty() || self.is_zero()
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        self.asset.valid()?;
        if self.decimals < 0 {
            return Err(CoreError::validation(format!(
                "coin {self}: decimals can't be negative"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.asset)
    }
}

impl FromStr for Coin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Shared vector arithmetic (Coins and Gas) ─────────────────────────────────

pub(crate) fn add_coins(base: &[Coin], extra: &[Coin]) -> Vec<Coin> {
    let mut out = base.to_vec();
    for coin in extra {
        match out.iter_mut().find(|c| c.asset == coin.asset) {
            Some(existing) => existing.amount += &coin.amount,
            None => out.push(coin.clone()),
        }
    }
    out
}

pub(crate) fn sub_coins(base: &[Coin], minus: &[Coin]) -> Vec<Coin> {
    let mut out = base.to_vec();
    for coin in minus {
        if let Some(existing) = out.iter_mut().find(|c| c.asset == coin.asset) {
            existing.amount = safe_sub(&existing.amount, &coin.amount);
        }
    }
    out
}

/// Copy ordered by asset, ignoring case, then amount.
pub(crate) fn sorted_coins(coins: &[Coin]) -> Vec<Coin> {
    let mut out = coins.to_vec();
    out.sort_by_cached_key(|c| (c.asset.to_string().to_ascii_uppercase(), c.amount.clone()));
    out
}

/// Order-insensitive equality; sorts copies, never the inputs.
pub(crate) fn coins_equal(a: &[Coin], b: &[Coin]) -> bool {
    a.len() == b.len() && sorted_coins(a) == sorted_coins(b)
}

// ── Coins ────────────────────────────────────────────────────────────────────

/// Ordered list of coins. Asset-unique by convention; `add`, `safe_sub` and
/// `distinct` keep it that way.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    pub fn into_inner(self) -> Vec<Coin> {
        self.0
    }

    /// Merge `coins` into a copy of `self`, summing matching assets and
    /// appending new ones in argument order.
    pub fn add(&self, coins: &[Coin]) -> Self {
        Self(add_coins(&self.0, coins))
    }

    /// Subtract matching assets, clamping at zero. Unmatched coins are ignored.
    pub fn safe_sub(&self, coins: &[Coin]) -> Self {
        Self(sub_coins(&self.0, coins))
    }

    /// Drop exact duplicates, keeping the first occurrence.
    pub fn distinct(&self) -> Self {
        let mut out: Vec<Coin> = Vec::with_capacity(self.0.len());
        for coin in &self.0 {
            if !out.contains(coin) {
                out.push(coin.clone());
            }
        }
        Self(out)
    }

    pub fn equals_ex(&self, other: &[Coin]) -> bool {
        coins_equal(&self.0, other)
    }

    /// Copy in canonical order, for hashing and signing.
    pub fn sorted(&self) -> Self {
        Self(sorted_coins(&self.0))
    }

    /// The coin for `asset`, or a zero coin of that asset.
    pub fn get_coin(&self, asset: &Asset) -> Coin {
        self.0
            .iter()
            .find(|c| c.asset == *asset)
            .cloned()
            .unwrap_or_else(|| Coin::new(asset.clone(), 0u32))
    }

    pub fn has(&self, asset: &Asset) -> bool {
        self.0.iter().any(|c| c.asset == *asset)
    }

    /// Copy without zero-amount entries.
    pub fn no_zero(&self) -> Self {
        Self(self.0.iter().filter(|c| !c.is_zero()).cloned().collect())
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        self.0.iter().try_for_each(Coin::valid)
    }

    /// Parse a comma separated list of `"<amount> <ASSET>"` entries.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        input
            .split(',')
            .map(|part| Coin::parse(part.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Deref for Coins {
    type Target = [Coin];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Coin>> for Coins {
    fn from(coins: Vec<Coin>) -> Self {
        Self(coins)
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Coins {
    type Item = Coin;
    type IntoIter = std::vec::IntoIter<Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}
