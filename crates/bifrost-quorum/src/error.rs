use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuorumError {
    // ── Aggregation ──────────────────────────────────────────────────────────
    #[error("no pending payload {0}")]
    UnknownPayload(String),

    // ── Encoding ─────────────────────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for QuorumError {
    fn from(e: bincode::Error) -> Self {
        QuorumError::Serialization(e.to_string())
    }
}
