use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::{debug, info, warn};

use crate::attestation::Attestation;
use crate::error::QuorumError;
use crate::policy::QuorumPolicy;
use crate::wrapper::QuorumWrapper;

/// BLAKE3 digest of a wrapper's payload key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadId([u8; 32]);

impl PayloadId {
    pub fn from_key(key: &str) -> Self {
        Self(*blake3::hash(key.as_bytes()).as_bytes())
    }

    pub fn of<Q: QuorumWrapper>(wrapper: &Q) -> Self {
        Self::from_key(&wrapper.payload_key())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadId({})", &hex::encode(self.0)[..16])
    }
}

/// Result of merging one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub id: PayloadId,
    /// Attestations from observers not seen before for this payload.
    pub added: usize,
    /// Attestations dropped because their observer had already attested
    /// this candidate.
    pub duplicates: usize,
    /// Attestations dropped because their observer already backs a
    /// different candidate under the same key.
    pub conflicts: usize,
    /// Distinct observers now attesting the matching candidate.
    pub attestations: usize,
    /// Competing candidates pending under the key.
    pub candidates: usize,
    /// The key was already released. Nothing was stored.
    pub already_released: bool,
}

/// Released ids remembered by default.
pub const DEFAULT_RELEASED_CAPACITY: usize = 1024;

/// Collects attestations per payload until a quorum policy releases it.
///
/// Observers may disagree about the payload behind a key. Each distinct
/// payload is kept as a candidate and the first one to satisfy the policy
/// is released. An observer key counts once per key: a second attestation
/// from it, for any candidate, is not counted.
///
/// Released ids are remembered up to a fixed capacity so late attestations
/// do not reopen them.
pub struct AttestationAggregator<Q: QuorumWrapper> {
    pending: HashMap<PayloadId, Vec<Q>>,
    released: HashSet<PayloadId>,
    released_order: VecDeque<PayloadId>,
    released_capacity: usize,
}

impl<Q: QuorumWrapper> AttestationAggregator<Q> {
    pub fn new() -> Self {
        Self::with_released_capacity(DEFAULT_RELEASED_CAPACITY)
    }

    pub fn with_released_capacity(capacity: usize) -> Self {
        Self {
            pending: HashMap::new(),
            released: HashSet::new(),
            released_order: VecDeque::new(),
            released_capacity: capacity,
        }
    }

    /// Merge `wrapper` into the matching candidate for its key, opening a
    /// new candidate when no pending payload equals it.
    pub fn submit(&mut self, wrapper: Q) -> SubmitOutcome {
        let id = PayloadId::of(&wrapper);
        let mut outcome = SubmitOutcome {
            id,
            added: 0,
            duplicates: 0,
            conflicts: 0,
            attestations: 0,
            candidates: 0,
            already_released: false,
        };

        if self.released.contains(&id) {
            debug!(payload = %id, "payload already released");
            outcome.already_released = true;
            return outcome;
        }
        let incoming = wrapper.get_attestations().to_vec();
        if incoming.is_empty() {
            if let Some(candidates) = self.pending.get(&id) {
                outcome.candidates = candidates.len();
                if let Some(found) = candidates.iter().find(|c| c.equals(&wrapper)) {
                    outcome.attestations = found.get_attestations().len();
                }
            }
            return outcome;
        }

        let candidates = self.pending.entry(id).or_default();
        let index = match candidates.iter().position(|c| c.equals(&wrapper)) {
            Some(index) => index,
            None => {
                if !candidates.is_empty() {
                    debug!(payload = %id, key = %wrapper.payload_key(), "competing payload");
                }
                let mut fresh = wrapper;
                fresh.set_attestations(Vec::new());
                candidates.push(fresh);
                candidates.len() - 1
            }
        };

        for attestation in incoming {
            if candidates[index].has_attestation_from(&attestation.pub_key) {
                outcome.duplicates += 1;
            } else if candidates
                .iter()
                .any(|c| c.has_attestation_from(&attestation.pub_key))
            {
                outcome.conflicts += 1;
            } else {
                candidates[index].add_attestation(attestation);
                outcome.added += 1;
            }
        }
        if outcome.conflicts > 0 {
            warn!(
                payload = %id,
                conflicts = outcome.conflicts,
                "observer attested competing payloads"
            );
        }

        // A candidate made only of conflicting attestations carries nothing.
        if candidates[index].get_attestations().is_empty() {
            candidates.remove(index);
        } else {
            outcome.attestations = candidates[index].get_attestations().len();
        }
        outcome.candidates = candidates.len();
        if candidates.is_empty() {
            self.pending.remove(&id);
        }

        debug!(
            payload = %id,
            added = outcome.added,
            duplicates = outcome.duplicates,
            attestations = outcome.attestations,
            candidates = outcome.candidates,
            "attestations merged"
        );
        outcome
    }

    /// Remove `attestations` from every candidate of a pending payload.
    /// Candidates left without attestations are dropped. Returns `true`
    /// when the payload was dropped because nothing attests to it anymore.
    /// Unknown payloads are ignored.
    pub fn withdraw(&mut self, id: &PayloadId, attestations: &[Attestation]) -> bool {
        let Some(candidates) = self.pending.get_mut(id) else {
            return false;
        };
        candidates.retain_mut(|c| !c.remove_attestations(attestations));
        if !candidates.is_empty() {
            return false;
        }
        self.pending.remove(id);
        debug!(payload = %id, "payload dropped, no attestations left");
        true
    }

    /// Release the first candidate whose attestations satisfy `policy`.
    ///
    /// Competing candidates under the same key are discarded and the id is
    /// remembered as released. A released id gives `Ok(None)`.
    pub fn take_if_quorum<P: QuorumPolicy>(
        &mut self,
        id: &PayloadId,
        policy: &P,
    ) -> Result<Option<Q>, QuorumError> {
        let candidates = match self.pending.get(id) {
            Some(candidates) => candidates,
            None if self.released.contains(id) => return Ok(None),
            None => return Err(QuorumError::UnknownPayload(id.to_string())),
        };
        let Some(index) = candidates
            .iter()
            .position(|c| policy.has_quorum(c.get_attestations().len()))
        else {
            return Ok(None);
        };

        let Some(mut candidates) = self.pending.remove(id) else {
            return Ok(None);
        };
        let agreed = candidates.swap_remove(index);
        self.mark_released(*id);
        info!(
            payload = %id,
            attestations = agreed.get_attestations().len(),
            threshold = policy.threshold(),
            discarded = candidates.len(),
            "quorum reached"
        );
        Ok(Some(agreed))
    }

    fn mark_released(&mut self, id: PayloadId) {
        if self.released_capacity == 0 || !self.released.insert(id) {
            return;
        }
        self.released_order.push_back(id);
        while self.released_order.len() > self.released_capacity {
            if let Some(oldest) = self.released_order.pop_front() {
                self.released.remove(&oldest);
            }
        }
    }

    /// Competing payloads pending under `id`, in arrival order.
    pub fn candidates(&self, id: &PayloadId) -> &[Q] {
        self.pending.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The candidate with the most attestations, earliest on ties.
    pub fn leading(&self, id: &PayloadId) -> Option<&Q> {
        self.candidates(id)
            .iter()
            .rev()
            .max_by_key(|c| c.get_attestations().len())
    }

    pub fn is_released(&self, id: &PayloadId) -> bool {
        self.released.contains(id)
    }

    /// Attestations behind the leading candidate.
    pub fn attestation_count(&self, id: &PayloadId) -> usize {
        self.leading(id)
            .map(|c| c.get_attestations().len())
            .unwrap_or(0)
    }

    /// Number of payloads still awaiting quorum.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<Q: QuorumWrapper> Default for AttestationAggregator<Q> {
    fn default() -> Self {
        Self::new()
    }
}
