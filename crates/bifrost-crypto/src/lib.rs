//! bifrost-crypto
//!
//! Foreign-chain address derivation from vault public keys: one codec per
//! address family, a registry of codecs keyed by chain, and the cache of
//! derived addresses.

pub mod cache;
pub mod codec;
pub mod error;
pub mod hash;
pub mod service;

pub use cache::AddressCache;
pub use codec::{
    default_codec, AddressCodec, CosmosCodec, EvmCodec, P2pkhCodec, SegwitCodec, SolanaCodec,
    TronCodec, XrpCodec,
};
pub use error::{AddressError, CodecError};
pub use service::AddressService;
