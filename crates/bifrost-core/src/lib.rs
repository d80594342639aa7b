//! bifrost-core
//!
//! Canonical value model shared by every foreign-chain watcher: the chain
//! registry, assets, coin and gas arithmetic, keys and addresses, and the
//! payloads observers attest to.

pub mod address;
pub mod asset;
pub mod chain;
pub mod coin;
pub mod config;
pub mod constants;
pub mod error;
pub mod gas;
pub mod network;
pub mod observed;
pub mod payload;
pub mod pubkey;
pub mod tx;

pub use address::Address;
pub use asset::{Asset, AssetKind, Symbol, Ticker};
pub use chain::{Chain, ChainFamily};
pub use coin::{Coin, Coins};
pub use config::BifrostConfig;
pub use constants::*;
pub use error::CoreError;
pub use gas::Gas;
pub use network::Network;
pub use observed::{ObservedTx, Status};
pub use payload::{ErrataTx, NetworkFee, Solvency};
pub use pubkey::{PubKey, PubKeySet, SigningAlgorithm};
pub use tx::{Tx, TxId};
