use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::Address;
use crate::coin::amount_str;
use crate::error::CoreError;
use crate::pubkey::PubKey;
use crate::tx::{Tx, TxId};

/// Completion state of an observed transaction. `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Incomplete,
    Done,
}

/// A foreign-chain transaction as reported by a watcher, tracked until every
/// outbound leg it triggers has been seen.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservedTx {
    pub tx: Tx,
    pub status: Status,
    /// Outbound transactions recorded against this one, in arrival order.
    pub out_hashes: Vec<TxId>,
    pub block_height: i64,
    /// Observers that have vouched for this transaction, in arrival order.
    pub signers: Vec<Address>,
    /// Vault key the transaction was sent to or from.
    pub observed_pub_key: PubKey,
    pub keysign_ms: i64,
    /// Height at which the source chain considers the tx irreversible.
    pub finalise_height: i64,
    #[serde(default)]
    pub aggregator: String,
    #[serde(default)]
    pub aggregator_target: String,
    #[serde(default, with = "amount_str::option")]
    pub aggregator_target_limit: Option<BigUint>,
}

impl ObservedTx {
    pub fn new(tx: Tx, block_height: i64, observed_pub_key: PubKey, finalise_height: i64) -> Self {
        Self {
            tx,
            block_height,
            observed_pub_key,
            finalise_height,
            ..Self::default()
        }
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        self.tx.valid()?;
        if self.block_height <= 0 {
            return Err(CoreError::validation(format!(
                "block height must be positive, got {}",
                self.block_height
            )));
        }
        if self.observed_pub_key.is_empty() {
            return Err(CoreError::validation("observed pubkey cannot be empty"));
        }
        if self.finalise_height < self.block_height {
            return Err(CoreError::validation(format!(
                "finalise height {} is below block height {}",
                self.finalise_height, self.block_height
            )));
        }
        Ok(())
    }

    /// Final once the finalise height has caught up with the block height.
    /// Independent of `status`.
    pub fn is_final(&self) -> bool {
        self.finalise_height == self.block_height
    }

    pub fn is_done(&self, expected_out_count: usize) -> bool {
        self.out_hashes.len() >= expected_out_count
    }

    /// Record an outbound hash. Non-blank hashes are recorded once; the blank
    /// hash may repeat since several zero-value legs can share it.
    pub fn set_done(&mut self, hash: TxId, expected_out_count: usize) {
        if !hash.is_blank() && self.out_hashes.contains(&hash) {
            return;
        }
        self.out_hashes.push(hash);
        if self.status != Status::Done && self.is_done(expected_out_count) {
            debug!(
                tx_id = %self.tx.id,
                out_hashes = self.out_hashes.len(),
                "observed tx done"
            );
            self.status = Status::Done;
        }
    }

    pub fn has_signed(&self, signer: &Address) -> bool {
        self.signers.contains(signer)
    }

    /// Add `signer`. Returns `false` when it had already signed.
    pub fn sign(&mut self, signer: Address) -> bool {
        if self.has_signed(&signer) {
            return false;
        }
        self.signers.push(signer);
        true
    }

    /// Observation equality. Signers and status are ignored; a missing
    /// target limit equals a zero one.
    pub fn equals(&self, other: &ObservedTx) -> bool {
        let zero = BigUint::default();
        let limit = self.aggregator_target_limit.as_ref().unwrap_or(&zero);
        let other_limit = other.aggregator_target_limit.as_ref().unwrap_or(&zero);

        self.tx.equals_ex(&other.tx)
            && self.observed_pub_key == other.observed_pub_key
            && self.block_height == other.block_height
            && self.finalise_height == other.finalise_height
            && self.aggregator.eq_ignore_ascii_case(&other.aggregator)
            && self
                .aggregator_target
                .eq_ignore_ascii_case(&other.aggregator_target)
            && limit == other_limit
    }
}
