/// Decides when enough observers have attested to act on a payload.
pub trait QuorumPolicy {
    /// Minimum number of distinct attesting observers.
    fn threshold(&self) -> usize;

    /// A zero threshold never reaches quorum.
    fn has_quorum(&self, signers: usize) -> bool {
        let threshold = self.threshold();
        threshold > 0 && signers >= threshold
    }
}

/// Two thirds of the active observer set, rounded up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupermajorityPolicy {
    pub active: usize,
}

impl SupermajorityPolicy {
    pub fn new(active: usize) -> Self {
        Self { active }
    }
}

impl QuorumPolicy for SupermajorityPolicy {
    fn threshold(&self) -> usize {
        // ceil(2n/3) = (2n + 2) / 3
        (2 * self.active + 2) / 3
    }
}

/// A fixed number of observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy(pub usize);

impl QuorumPolicy for ThresholdPolicy {
    fn threshold(&self) -> usize {
        self.0
    }
}
