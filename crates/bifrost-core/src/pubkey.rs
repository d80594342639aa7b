use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chain::Chain;
use crate::error::CoreError;
use crate::network::Network;

/// Amino type prefix in front of a bech32-wrapped secp256k1 key.
const SECP256K1_AMINO_PREFIX: [u8; 5] = [0xeb, 0x5a, 0xe9, 0x87, 0x21];
/// Amino type prefix in front of a bech32-wrapped ed25519 key.
const ED25519_AMINO_PREFIX: [u8; 5] = [0x16, 0x24, 0xde, 0x64, 0x20];

// ── SigningAlgorithm ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningAlgorithm {
    #[default]
    Secp256k1,
    Ed25519,
}

impl SigningAlgorithm {
    /// Length of the raw key: compressed SEC1 point or ed25519 point.
    pub fn key_len(&self) -> usize {
        match self {
            SigningAlgorithm::Secp256k1 => 33,
            SigningAlgorithm::Ed25519 => 32,
        }
    }

    fn amino_prefix(&self) -> [u8; 5] {
        match self {
            SigningAlgorithm::Secp256k1 => SECP256K1_AMINO_PREFIX,
            SigningAlgorithm::Ed25519 => ED25519_AMINO_PREFIX,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningAlgorithm::Secp256k1 => f.write_str("secp256k1"),
            SigningAlgorithm::Ed25519 => f.write_str("ed25519"),
        }
    }
}

// ── PubKey ───────────────────────────────────────────────────────────────────

/// Bech32 account public key, e.g. `thorpub1addwnpepq...`.
///
/// The string is the canonical form; JSON round-trips through it unchanged.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PubKey(String);

impl PubKey {
    pub fn new(input: &str) -> Result<Self, CoreError> {
        let key = Self(input.to_string());
        key.decode()?;
        Ok(key)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap raw key bytes under `hrp` with the algorithm's amino prefix.
    pub fn from_key_bytes(
        hrp: &str,
        algorithm: SigningAlgorithm,
        key: &[u8],
    ) -> Result<Self, CoreError> {
        let invalid = |reason: String| CoreError::InvalidPubKey {
            input: hex::encode(key),
            reason,
        };
        if key.len() != algorithm.key_len() {
            return Err(invalid(format!(
                "{algorithm} key must be {} bytes, got {}",
                algorithm.key_len(),
                key.len()
            )));
        }
        let hrp = Hrp::parse(hrp).map_err(|e| invalid(e.to_string()))?;
        let mut data = algorithm.amino_prefix().to_vec();
        data.extend_from_slice(key);
        bech32::encode::<Bech32>(hrp, &data)
            .map(Self)
            .map_err(|e| invalid(e.to_string()))
    }

    /// Human-readable prefix used for keys on `network`.
    pub fn hrp_for(network: Network) -> String {
        format!("{}pub", Chain::thorchain().address_prefix(network))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Algorithm and raw key bytes carried by this key.
    pub fn decode(&self) -> Result<(SigningAlgorithm, Vec<u8>), CoreError> {
        let invalid = |reason: String| CoreError::InvalidPubKey {
            input: self.0.clone(),
            reason,
        };
        let (hrp, data) = bech32::decode(&self.0).map_err(|e| invalid(e.to_string()))?;
        if !hrp.as_str().ends_with("pub") {
            return Err(invalid(format!("unexpected prefix {hrp}")));
        }
        for algorithm in [SigningAlgorithm::Secp256k1, SigningAlgorithm::Ed25519] {
            if let Some(key) = data.strip_prefix(&algorithm.amino_prefix()[..]) {
                if key.len() == algorithm.key_len() {
                    return Ok((algorithm, key.to_vec()));
                }
            }
        }
        Err(invalid(format!("unrecognised key payload of {} bytes", data.len())))
    }

    pub fn algorithm(&self) -> Result<SigningAlgorithm, CoreError> {
        self.decode().map(|(algorithm, _)| algorithm)
    }

    pub fn key_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.decode().map(|(_, key)| key)
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", self.0)
    }
}

impl FromStr for PubKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PubKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::empty());
        }
        Self::new(&value)
    }
}

impl From<PubKey> for String {
    fn from(key: PubKey) -> Self {
        key.0
    }
}

// ── PubKeySet ────────────────────────────────────────────────────────────────

/// The keys of one vault or signer, one per supported algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PubKeySet {
    pub secp256k1: PubKey,
    pub ed25519: PubKey,
}

impl PubKeySet {
    pub fn new(secp256k1: PubKey, ed25519: PubKey) -> Self {
        Self { secp256k1, ed25519 }
    }

    pub fn key_for(&self, algorithm: SigningAlgorithm) -> &PubKey {
        match algorithm {
            SigningAlgorithm::Secp256k1 => &self.secp256k1,
            SigningAlgorithm::Ed25519 => &self.ed25519,
        }
    }

    /// The key that signs for `chain`.
    pub fn key_for_chain(&self, chain: &Chain) -> &PubKey {
        self.key_for(chain.signing_algorithm())
    }

    pub fn contains(&self, key: &PubKey) -> bool {
        !key.is_empty() && (self.secp256k1 == *key || self.ed25519 == *key)
    }

    pub fn is_empty(&self) -> bool {
        self.secp256k1.is_empty() && self.ed25519.is_empty()
    }
}
