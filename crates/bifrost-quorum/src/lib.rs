//! bifrost-quorum
//!
//! Attestations from independent observers, the wrappers that carry them
//! alongside each observable payload, and the aggregator that merges
//! submissions until a caller-supplied quorum policy is met.

pub mod aggregator;
pub mod attestation;
pub mod error;
pub mod policy;
pub mod wrapper;

pub use aggregator::{
    AttestationAggregator, PayloadId, SubmitOutcome, DEFAULT_RELEASED_CAPACITY,
};
pub use attestation::Attestation;
pub use error::QuorumError;
pub use policy::{QuorumPolicy, SupermajorityPolicy, ThresholdPolicy};
pub use wrapper::{QuorumErrataTx, QuorumNetworkFee, QuorumSolvency, QuorumTx, QuorumWrapper};
