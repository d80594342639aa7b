use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ── Registry errors ──────────────────────────────────────────────────────
    /// The chain is not registered for the active network. Callers match on
    /// this variant to tell "unknown chain" apart from malformed input.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    // ── Parse errors ─────────────────────────────────────────────────────────
    #[error("invalid chain {input:?}: {reason}")]
    InvalidChain { input: String, reason: &'static str },

    #[error("invalid symbol {0:?}")]
    InvalidSymbol(String),

    #[error("invalid ticker {0:?}")]
    InvalidTicker(String),

    #[error("invalid asset {input:?}: {reason}")]
    InvalidAsset { input: String, reason: String },

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("invalid coin {input:?}: {reason}")]
    InvalidCoin { input: String, reason: String },

    #[error("invalid pubkey {input:?}: {reason}")]
    InvalidPubKey { input: String, reason: String },

    #[error("invalid tx id {0:?}")]
    InvalidTxId(String),

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("{0}")]
    Validation(String),

    // ── Configuration / serialization ────────────────────────────────────────
    #[error("network already configured as {current}, refusing to switch to {requested}")]
    NetworkAlreadySet { current: String, requested: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}
