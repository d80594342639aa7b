use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::Chain;
use crate::network::Network;

/// Chain-native address text. Structure and validity are chain specific;
/// this type only carries the string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().to_string())
    }

    /// The "no address" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the address carries `chain`'s prefix on `network`. Chains with
    /// no prefix accept any non-empty address.
    pub fn has_chain_prefix(&self, chain: &Chain, network: Network) -> bool {
        !self.is_empty() && self.0.starts_with(chain.address_prefix(network))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
