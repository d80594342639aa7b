use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::chain::Chain;
use crate::coin::Coins;
use crate::constants::BLANK_TX_ID;
use crate::error::CoreError;
use crate::gas::Gas;

// ── TxId ─────────────────────────────────────────────────────────────────────

/// Transaction hash on a foreign chain.
///
/// 32-byte hex hashes (with or without `0x`) are normalised to 64 uppercase
/// hex characters; base58 signatures (86–88 chars) are kept verbatim.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(String);

impl TxId {
    pub fn new(input: &str) -> Result<Self, CoreError> {
        let hex_part = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if hex_part.len() == 64 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(Self(hex_part.to_ascii_uppercase()));
        }
        let base58 = (86..=88).contains(&input.len())
            && input
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l'));
        if base58 {
            return Ok(Self(input.to_string()));
        }
        Err(CoreError::InvalidTxId(input.to_string()))
    }

    /// Placeholder hash for zero-value outbound legs.
    pub fn blank() -> Self {
        Self(BLANK_TX_ID.to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0 == BLANK_TX_ID
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.0.get(..16).unwrap_or(&self.0);
        write!(f, "TxId({short}…)")
    }
}

impl FromStr for TxId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TxId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::default());
        }
        Self::new(&value)
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.0
    }
}

// ── Tx ───────────────────────────────────────────────────────────────────────

/// A transaction as seen on a foreign chain.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tx {
    pub id: TxId,
    pub chain: Chain,
    pub from_address: Address,
    pub to_address: Address,
    pub coins: Coins,
    pub gas: Gas,
    pub memo: String,
}

impl Tx {
    pub fn new(
        id: TxId,
        chain: Chain,
        from_address: Address,
        to_address: Address,
        coins: Coins,
        gas: Gas,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            id,
            chain,
            from_address,
            to_address,
            coins,
            gas,
            memo: memo.into(),
        }
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::validation("tx id cannot be empty"));
        }
        self.chain.valid()?;
        if self.from_address.is_empty() {
            return Err(CoreError::validation("from address cannot be empty"));
        }
        if self.to_address.is_empty() {
            return Err(CoreError::validation("to address cannot be empty"));
        }
        self.coins.valid()?;
        self.gas.valid()?;
        let max_memo = self.chain.max_memo_length();
        if max_memo > 0 && self.memo.len() > max_memo {
            return Err(CoreError::validation(format!(
                "memo exceeds {max_memo} bytes allowed on {}",
                self.chain
            )));
        }
        Ok(())
    }

    /// Content equality: coin and gas order is ignored, memo case is ignored.
    pub fn equals_ex(&self, other: &Tx) -> bool {
        self.id == other.id
            && self.chain == other.chain
            && self.from_address == other.from_address
            && self.to_address == other.to_address
            && self.coins.equals_ex(&other.coins)
            && self.gas.equals(&other.gas)
            && self.memo.eq_ignore_ascii_case(&other.memo)
    }
}
