use serde::{Deserialize, Serialize};
use std::fmt;

/// An observer's signature over a payload's signing bytes.
///
/// The bytes are opaque here; checking the signature is the caller's job.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Attestation {
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Attestation {
    pub fn new(pub_key: impl Into<Vec<u8>>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            pub_key: pub_key.into(),
            signature: signature.into(),
        }
    }

    /// Exact byte equality of key and signature.
    pub fn equals(&self, other: &Attestation) -> bool {
        self.pub_key == other.pub_key && self.signature == other.signature
    }

    /// Whether both attestations come from the same observer key.
    pub fn same_signer(&self, other: &Attestation) -> bool {
        self.pub_key == other.pub_key
    }
}

impl fmt::Debug for Attestation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attestation({})", hex::encode(&self.pub_key))
    }
}
