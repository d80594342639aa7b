use bifrost_core::{Chain, PubKey, SigningAlgorithm};
use thiserror::Error;

/// Failure inside a single codec, before chain/key context is attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("expected {expected} key, got {got}")]
    AlgorithmMismatch {
        expected: SigningAlgorithm,
        got: SigningAlgorithm,
    },

    #[error("encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("malformed pubkey {pubkey} for chain {chain}: {reason}")]
    MalformedPubKey {
        chain: Chain,
        pubkey: PubKey,
        reason: String,
    },

    #[error("chain {chain} needs a {expected} key, {pubkey} is {got}")]
    AlgorithmMismatch {
        chain: Chain,
        pubkey: PubKey,
        expected: SigningAlgorithm,
        got: SigningAlgorithm,
    },

    #[error("failed to encode {chain} address for {pubkey}: {reason}")]
    Encoding {
        chain: Chain,
        pubkey: PubKey,
        reason: String,
    },
}

impl AddressError {
    pub(crate) fn from_codec(err: CodecError, chain: &Chain, pubkey: &PubKey) -> Self {
        let chain = chain.clone();
        let pubkey = pubkey.clone();
        match err {
            CodecError::MalformedKey(reason) => AddressError::MalformedPubKey {
                chain,
                pubkey,
                reason,
            },
            CodecError::AlgorithmMismatch { expected, got } => AddressError::AlgorithmMismatch {
                chain,
                pubkey,
                expected,
                got,
            },
            CodecError::Encoding(reason) => AddressError::Encoding {
                chain,
                pubkey,
                reason,
            },
        }
    }
}
