use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::asset::Asset;
use crate::constants::NATIVE_CHAIN;
use crate::error::CoreError;
use crate::network::{self, Network};
use crate::pubkey::SigningAlgorithm;

// ── ChainFamily ──────────────────────────────────────────────────────────────

/// How a chain encodes addresses and accounts. Drives codec selection in the
/// address derivation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    /// Cosmos-SDK account chains (bech32 of RIPEMD160(SHA256(key))).
    Cosmos,
    /// Bitcoin-style chains using native segwit addresses.
    Segwit,
    /// Bitcoin-style chains using legacy base58 pay-to-pubkey-hash.
    P2pkh,
    /// 0x-addressed chains with a router contract.
    Evm,
    Xrp,
    Tron,
    Solana,
}

// ── Registry table ───────────────────────────────────────────────────────────

struct ChainInfo {
    code: &'static str,
    family: ChainFamily,
    algorithm: SigningAlgorithm,
    gas_symbol: &'static str,
    gas_units: &'static str,
    gas_decimals: i64,
    dust_threshold: u64,
    max_memo_length: usize,
    block_ms: u64,
    /// Chain id on Mainnet and Stagenet.
    main_id: u64,
    /// Chain id on Mocknet, `None` when the chain is not run there.
    mock_id: Option<u64>,
    /// Address prefix for Mainnet, Stagenet, Mocknet.
    prefixes: [&'static str; 3],
}

const REGISTRY: &[ChainInfo] = &[
    ChainInfo {
        code: NATIVE_CHAIN,
        family: ChainFamily::Cosmos,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "RUNE",
        gas_units: "rune",
        gas_decimals: 8,
        dust_threshold: 0,
        max_memo_length: 0,
        block_ms: 6_000,
        main_id: 931,
        mock_id: Some(931),
        prefixes: ["thor", "sthor", "tthor"],
    },
    ChainInfo {
        code: "BTC",
        family: ChainFamily::Segwit,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "BTC",
        gas_units: "satsperbyte",
        gas_decimals: 8,
        dust_threshold: 10_000,
        max_memo_length: 80,
        block_ms: 600_000,
        main_id: 0,
        mock_id: Some(0),
        prefixes: ["bc", "bc", "bcrt"],
    },
    ChainInfo {
        code: "ETH",
        family: ChainFamily::Evm,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "ETH",
        gas_units: "gwei",
        gas_decimals: 18,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 12_000,
        main_id: 1,
        mock_id: Some(1337),
        prefixes: ["0x", "0x", "0x"],
    },
    ChainInfo {
        code: "LTC",
        family: ChainFamily::Segwit,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "LTC",
        gas_units: "satsperbyte",
        gas_decimals: 8,
        dust_threshold: 10_000,
        max_memo_length: 80,
        block_ms: 150_000,
        main_id: 2,
        mock_id: Some(2),
        prefixes: ["ltc", "ltc", "rltc"],
    },
    ChainInfo {
        code: "BCH",
        family: ChainFamily::P2pkh,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "BCH",
        gas_units: "satsperbyte",
        gas_decimals: 8,
        dust_threshold: 10_000,
        max_memo_length: 220,
        block_ms: 600_000,
        main_id: 145,
        mock_id: Some(145),
        prefixes: ["1", "1", "m"],
    },
    ChainInfo {
        code: "DOGE",
        family: ChainFamily::P2pkh,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "DOGE",
        gas_units: "satsperbyte",
        gas_decimals: 8,
        dust_threshold: 100_000_000,
        max_memo_length: 80,
        block_ms: 60_000,
        main_id: 3,
        mock_id: Some(3),
        prefixes: ["D", "D", "m"],
    },
    ChainInfo {
        code: "GAIA",
        family: ChainFamily::Cosmos,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "ATOM",
        gas_units: "uatom",
        gas_decimals: 6,
        dust_threshold: 1,
        max_memo_length: 256,
        block_ms: 6_000,
        main_id: 118,
        mock_id: Some(118),
        prefixes: ["cosmos", "cosmos", "cosmos"],
    },
    ChainInfo {
        code: "AVAX",
        family: ChainFamily::Evm,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "AVAX",
        gas_units: "nAVAX",
        gas_decimals: 18,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 3_000,
        main_id: 43_114,
        mock_id: Some(43_112),
        prefixes: ["0x", "0x", "0x"],
    },
    ChainInfo {
        code: "BSC",
        family: ChainFamily::Evm,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "BNB",
        gas_units: "gwei",
        gas_decimals: 18,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 3_000,
        main_id: 56,
        mock_id: Some(1338),
        prefixes: ["0x", "0x", "0x"],
    },
    ChainInfo {
        code: "BASE",
        family: ChainFamily::Evm,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "ETH",
        gas_units: "gwei",
        gas_decimals: 18,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 2_000,
        main_id: 8_453,
        mock_id: Some(1339),
        prefixes: ["0x", "0x", "0x"],
    },
    ChainInfo {
        code: "XRP",
        family: ChainFamily::Xrp,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "XRP",
        gas_units: "drop",
        gas_decimals: 6,
        dust_threshold: 1_000_000,
        max_memo_length: 0,
        block_ms: 4_000,
        main_id: 144,
        mock_id: Some(144),
        prefixes: ["r", "r", "r"],
    },
    ChainInfo {
        code: "TRON",
        family: ChainFamily::Tron,
        algorithm: SigningAlgorithm::Secp256k1,
        gas_symbol: "TRX",
        gas_units: "sun",
        gas_decimals: 6,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 3_000,
        main_id: 195,
        mock_id: None,
        prefixes: ["T", "T", "T"],
    },
    ChainInfo {
        code: "SOL",
        family: ChainFamily::Solana,
        algorithm: SigningAlgorithm::Ed25519,
        gas_symbol: "SOL",
        gas_units: "lamport",
        gas_decimals: 9,
        dust_threshold: 1,
        max_memo_length: 0,
        block_ms: 400,
        main_id: 501,
        mock_id: None,
        prefixes: ["", "", ""],
    },
];

fn network_index(network: Network) -> usize {
    match network {
        Network::Mainnet => 0,
        Network::Stagenet => 1,
        Network::Mocknet => 2,
    }
}

impl ChainInfo {
    fn id_for(&self, network: Network) -> Option<u64> {
        if network.is_test() {
            self.mock_id
        } else {
            Some(self.main_id)
        }
    }
}

// ── Chain ────────────────────────────────────────────────────────────────────

/// Short uppercase chain code such as `BTC` or `ETH`.
///
/// Metadata lookups are total: an unknown chain yields the zero value of the
/// result type. Only `valid` and `chain_id` report unregistered chains.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chain(String);

impl Chain {
    /// Parse a chain code for the configured network.
    pub fn new(input: &str) -> Result<Self, CoreError> {
        Self::new_for(input, network::current())
    }

    pub fn new_for(input: &str, network: Network) -> Result<Self, CoreError> {
        let chain = Self::unchecked(input);
        chain.check_format(input)?;
        chain.valid_for(network)?;
        Ok(chain)
    }

    /// Build a chain from a code without consulting the registry.
    pub fn unchecked(code: &str) -> Self {
        Self(code.to_ascii_uppercase())
    }

    pub fn thorchain() -> Self {
        Self(NATIVE_CHAIN.to_string())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn check_format(&self, input: &str) -> Result<(), CoreError> {
        let len = self.0.len();
        if len < 3 {
            return Err(CoreError::InvalidChain {
                input: input.to_string(),
                reason: "chain code shorter than 3 characters",
            });
        }
        if len > 10 {
            return Err(CoreError::InvalidChain {
                input: input.to_string(),
                reason: "chain code longer than 10 characters",
            });
        }
        if !self.0.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidChain {
                input: input.to_string(),
                reason: "chain code must be alphanumeric",
            });
        }
        Ok(())
    }

    fn info(&self) -> Option<&'static ChainInfo> {
        REGISTRY.iter().find(|info| info.code == self.0)
    }

    fn info_for(&self, network: Network) -> Option<&'static ChainInfo> {
        self.info().filter(|info| info.id_for(network).is_some())
    }

    // ── Registry membership ──────────────────────────────────────────────────

    pub fn valid(&self) -> Result<(), CoreError> {
        self.valid_for(network::current())
    }

    pub fn valid_for(&self, network: Network) -> Result<(), CoreError> {
        match self.info_for(network) {
            Some(_) => Ok(()),
            None => Err(CoreError::UnsupportedChain(self.0.clone())),
        }
    }

    pub fn chain_id(&self) -> Result<u64, CoreError> {
        self.chain_id_for(network::current())
    }

    pub fn chain_id_for(&self, network: Network) -> Result<u64, CoreError> {
        self.info()
            .and_then(|info| info.id_for(network))
            .ok_or_else(|| CoreError::UnsupportedChain(self.0.clone()))
    }

    /// Inverse of `chain_id`. A missing or unregistered id is simply not found.
    pub fn from_id(id: Option<u64>) -> Option<Self> {
        Self::from_id_for(id, network::current())
    }

    pub fn from_id_for(id: Option<u64>, network: Network) -> Option<Self> {
        let id = id?;
        REGISTRY
            .iter()
            .find(|info| info.id_for(network) == Some(id))
            .map(|info| Self(info.code.to_string()))
    }

    /// Every chain registered for `network`, in registry order.
    pub fn registered(network: Network) -> Vec<Self> {
        REGISTRY
            .iter()
            .filter(|info| info.id_for(network).is_some())
            .map(|info| Self(info.code.to_string()))
            .collect()
    }

    // ── Static metadata ──────────────────────────────────────────────────────

    pub fn is_thorchain(&self) -> bool {
        self.0 == NATIVE_CHAIN
    }

    pub fn family(&self) -> Option<ChainFamily> {
        self.info().map(|info| info.family)
    }

    pub fn signing_algorithm(&self) -> SigningAlgorithm {
        self.info().map(|info| info.algorithm).unwrap_or_default()
    }

    pub fn gas_asset(&self) -> Asset {
        match self.info() {
            Some(info) => Asset::native(self.clone(), info.gas_symbol),
            None => Asset::empty(),
        }
    }

    pub fn gas_units(&self) -> &'static str {
        self.info().map(|info| info.gas_units).unwrap_or("")
    }

    pub fn gas_asset_decimals(&self) -> i64 {
        self.info().map(|info| info.gas_decimals).unwrap_or(0)
    }

    /// Minimum amount (in the system's 8-decimal unit) below which a memoless
    /// inbound is ignored.
    pub fn dust_threshold(&self) -> u64 {
        self.info().map(|info| info.dust_threshold).unwrap_or(0)
    }

    /// Maximum memo size in bytes, 0 when the chain imposes none.
    pub fn max_memo_length(&self) -> usize {
        self.info().map(|info| info.max_memo_length).unwrap_or(0)
    }

    pub fn address_prefix(&self, network: Network) -> &'static str {
        self.info()
            .map(|info| info.prefixes[network_index(network)])
            .unwrap_or("")
    }

    pub fn approximate_block_milliseconds(&self) -> u64 {
        self.info().map(|info| info.block_ms).unwrap_or(0)
    }

    pub fn is_evm(&self) -> bool {
        self.family() == Some(ChainFamily::Evm)
    }

    pub fn is_utxo(&self) -> bool {
        matches!(self.family(), Some(ChainFamily::Segwit | ChainFamily::P2pkh))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain({})", self.0)
    }
}

impl FromStr for Chain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Chain {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::empty());
        }
        Self::new(&value)
    }
}

impl From<Chain> for String {
    fn from(chain: Chain) -> Self {
        chain.0
    }
}
