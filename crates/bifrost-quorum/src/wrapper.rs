use bifrost_core::{
    Address, Chain, Coins, ErrataTx, Gas, NetworkFee, ObservedTx, PubKey, Solvency, TxId,
};
use serde::{Deserialize, Serialize};

use crate::attestation::Attestation;
use crate::error::QuorumError;

/// A payload carrying the attestations of the observers that vouch for it.
///
/// The wrapper only maintains the attestation list. Whether enough of them
/// exist is decided by a [`crate::QuorumPolicy`].
pub trait QuorumWrapper: Clone {
    fn get_attestations(&self) -> &[Attestation];

    fn attestations_mut(&mut self) -> &mut Vec<Attestation>;

    /// Payload equality. Attestations are not compared.
    fn equals(&self, other: &Self) -> bool;

    /// Identity of the claim: wrappers with the same key describe the same
    /// external event. Observers may still disagree on its payload.
    fn payload_key(&self) -> String;

    /// Canonical bytes an observer signs to attest to this payload. Equal
    /// payloads give equal bytes.
    fn signing_bytes(&self) -> Result<Vec<u8>, QuorumError>;

    /// Replace the attestation list.
    fn set_attestations(&mut self, attestations: Vec<Attestation>) {
        *self.attestations_mut() = attestations;
    }

    fn add_attestation(&mut self, attestation: Attestation) {
        self.attestations_mut().push(attestation);
    }

    /// Remove the first exact match of each entry in `to_remove`. Returns
    /// whether the list is empty afterwards.
    fn remove_attestations(&mut self, to_remove: &[Attestation]) -> bool {
        let list = self.attestations_mut();
        for target in to_remove {
            if let Some(pos) = list.iter().position(|a| a.equals(target)) {
                list.remove(pos);
            }
        }
        list.is_empty()
    }

    fn has_attestation_from(&self, pub_key: &[u8]) -> bool {
        self.get_attestations().iter().any(|a| a.pub_key == pub_key)
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, QuorumError> {
    Ok(bincode::serialize(payload)?)
}

// ── QuorumTx ─────────────────────────────────────────────────────────────────

/// An observed inbound or outbound transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuorumTx {
    pub obs_tx: ObservedTx,
    pub inbound: bool,
    pub attestations: Vec<Attestation>,
}

/// The fields of an observation that observers agree on. Signers, status
/// and out hashes are local bookkeeping and stay out of the signed bytes.
/// Coins and gas are in canonical order and the memo is upper-cased, so
/// payloads that compare equal sign the same bytes.
#[derive(Serialize)]
struct TxClaim<'a> {
    inbound: bool,
    id: &'a TxId,
    chain: &'a Chain,
    from_address: &'a Address,
    to_address: &'a Address,
    coins: Coins,
    gas: Gas,
    memo: String,
    block_height: i64,
    finalise_height: i64,
    observed_pub_key: &'a PubKey,
    aggregator: &'a str,
    aggregator_target: &'a str,
    aggregator_target_limit: String,
}

impl QuorumTx {
    pub fn new(obs_tx: ObservedTx, inbound: bool, attestations: Vec<Attestation>) -> Self {
        Self {
            obs_tx,
            inbound,
            attestations,
        }
    }
}

impl QuorumWrapper for QuorumTx {
    fn get_attestations(&self) -> &[Attestation] {
        &self.attestations
    }

    fn attestations_mut(&mut self) -> &mut Vec<Attestation> {
        &mut self.attestations
    }

    fn equals(&self, other: &Self) -> bool {
        self.inbound == other.inbound && self.obs_tx.equals(&other.obs_tx)
    }

    fn payload_key(&self) -> String {
        let direction = if self.inbound { "in" } else { "out" };
        format!(
            "tx/{direction}/{}/{}/{}",
            self.obs_tx.tx.chain, self.obs_tx.tx.id, self.obs_tx.block_height
        )
    }

    fn signing_bytes(&self) -> Result<Vec<u8>, QuorumError> {
        let obs = &self.obs_tx;
        encode(&TxClaim {
            inbound: self.inbound,
            id: &obs.tx.id,
            chain: &obs.tx.chain,
            from_address: &obs.tx.from_address,
            to_address: &obs.tx.to_address,
            coins: obs.tx.coins.sorted(),
            gas: obs.tx.gas.sorted(),
            memo: obs.tx.memo.to_ascii_uppercase(),
            block_height: obs.block_height,
            finalise_height: obs.finalise_height,
            observed_pub_key: &obs.observed_pub_key,
            aggregator: &obs.aggregator,
            aggregator_target: &obs.aggregator_target,
            // A missing limit signs the same as zero.
            aggregator_target_limit: obs
                .aggregator_target_limit
                .as_ref()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "0".into()),
        })
    }
}

// ── QuorumNetworkFee ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuorumNetworkFee {
    pub network_fee: NetworkFee,
    pub attestations: Vec<Attestation>,
}

impl QuorumNetworkFee {
    pub fn new(network_fee: NetworkFee, attestations: Vec<Attestation>) -> Self {
        Self {
            network_fee,
            attestations,
        }
    }
}

impl QuorumWrapper for QuorumNetworkFee {
    fn get_attestations(&self) -> &[Attestation] {
        &self.attestations
    }

    fn attestations_mut(&mut self) -> &mut Vec<Attestation> {
        &mut self.attestations
    }

    fn equals(&self, other: &Self) -> bool {
        self.network_fee == other.network_fee
    }

    fn payload_key(&self) -> String {
        format!("fee/{}/{}", self.network_fee.chain, self.network_fee.height)
    }

    fn signing_bytes(&self) -> Result<Vec<u8>, QuorumError> {
        encode(&self.network_fee)
    }
}

// ── QuorumSolvency ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuorumSolvency {
    pub solvency: Solvency,
    pub attestations: Vec<Attestation>,
}

impl QuorumSolvency {
    pub fn new(solvency: Solvency, attestations: Vec<Attestation>) -> Self {
        Self {
            solvency,
            attestations,
        }
    }
}

impl QuorumWrapper for QuorumSolvency {
    fn get_attestations(&self) -> &[Attestation] {
        &self.attestations
    }

    fn attestations_mut(&mut self) -> &mut Vec<Attestation> {
        &mut self.attestations
    }

    fn equals(&self, other: &Self) -> bool {
        self.solvency.equals(&other.solvency)
    }

    fn payload_key(&self) -> String {
        // Keyed by vault and height, not by the content id.
        format!(
            "solvency/{}/{}/{}",
            self.solvency.chain, self.solvency.pub_key, self.solvency.height
        )
    }

    fn signing_bytes(&self) -> Result<Vec<u8>, QuorumError> {
        encode(&Solvency {
            coins: self.solvency.coins.sorted(),
            ..self.solvency.clone()
        })
    }
}

// ── QuorumErrataTx ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuorumErrataTx {
    pub errata_tx: ErrataTx,
    pub attestations: Vec<Attestation>,
}

impl QuorumErrataTx {
    pub fn new(errata_tx: ErrataTx, attestations: Vec<Attestation>) -> Self {
        Self {
            errata_tx,
            attestations,
        }
    }
}

impl QuorumWrapper for QuorumErrataTx {
    fn get_attestations(&self) -> &[Attestation] {
        &self.attestations
    }

    fn attestations_mut(&mut self) -> &mut Vec<Attestation> {
        &mut self.attestations
    }

    fn equals(&self, other: &Self) -> bool {
        self.errata_tx == other.errata_tx
    }

    fn payload_key(&self) -> String {
        format!("errata/{}/{}", self.errata_tx.chain, self.errata_tx.id)
    }

    fn signing_bytes(&self) -> Result<Vec<u8>, QuorumError> {
        encode(&self.errata_tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifrost_core::{Asset, Coin, Tx};

    const VAULT: &str =
        "thorpub1addwnpepqfumuen7l8wthtz45p3ftn58pvrs9xlumvkuu2xet8egzkcklqtesc6p3ea";

    fn att(key: u8, sig: u8) -> Attestation {
        Attestation::new(vec![key; 33], vec![sig; 64])
    }

    fn obs_tx() -> ObservedTx {
        let tx = Tx::new(
            TxId::new(&"cd".repeat(32)).unwrap(),
            Chain::unchecked("BTC"),
            Address::new("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            Address::new("bc1qvault"),
            Coins::new(vec![Coin::new(Asset::btc(), 150_000u32)]),
            Gas::new(vec![Coin::new(Asset::btc(), 2_500u32)]),
            "+:BTC.BTC",
        );
        ObservedTx::new(tx, 800_000, PubKey::new(VAULT).unwrap(), 800_002)
    }

    #[test]
    fn remove_reports_emptiness() {
        let mut q = QuorumTx::new(obs_tx(), true, vec![att(1, 1), att(2, 2)]);
        assert!(!q.remove_attestations(&[att(1, 1)]));
        assert_eq!(q.get_attestations().len(), 1);
        // No match leaves the list alone.
        assert!(!q.remove_attestations(&[att(1, 1), att(2, 9)]));
        assert_eq!(q.get_attestations().len(), 1);
        assert!(q.remove_attestations(&[att(2, 2)]));
        assert!(q.get_attestations().is_empty());
    }

    #[test]
    fn remove_takes_one_copy_per_entry() {
        let mut q = QuorumErrataTx::new(
            ErrataTx::new(TxId::new(&"ab".repeat(32)).unwrap(), Chain::unchecked("ETH")),
            vec![att(1, 1), att(1, 1)],
        );
        assert!(!q.remove_attestations(&[att(1, 1)]));
        assert_eq!(q.get_attestations().len(), 1);
    }

    #[test]
    fn set_and_add() {
        let mut q = QuorumNetworkFee::new(
            NetworkFee::new(100, Chain::unchecked("BTC"), 250, 20),
            vec![],
        );
        q.add_attestation(att(1, 1));
        assert!(q.has_attestation_from(&[1; 33]));
        q.set_attestations(vec![att(2, 2), att(3, 3)]);
        assert_eq!(q.get_attestations(), &[att(2, 2), att(3, 3)]);
        assert!(!q.has_attestation_from(&[1; 33]));
    }

    #[test]
    fn equality_ignores_attestations_and_signers() {
        let mut a = QuorumTx::new(obs_tx(), true, vec![att(1, 1)]);
        let b = QuorumTx::new(obs_tx(), true, vec![att(2, 2)]);
        a.obs_tx.sign(Address::new("thor1observer"));
        assert!(a.equals(&b));
        assert_eq!(a.payload_key(), b.payload_key());
        assert_eq!(a.signing_bytes().unwrap(), b.signing_bytes().unwrap());

        let outbound = QuorumTx::new(obs_tx(), false, vec![]);
        assert!(!a.equals(&outbound));
        assert_ne!(a.payload_key(), outbound.payload_key());
    }

    #[test]
    fn signing_bytes_track_content() {
        let a = QuorumTx::new(obs_tx(), true, vec![]);
        let mut changed = a.clone();
        changed.obs_tx.tx.memo = "+:BTC.BTC:thor1other".into();
        assert_ne!(a.signing_bytes().unwrap(), changed.signing_bytes().unwrap());

        let mut limited = a.clone();
        limited.obs_tx.aggregator_target_limit = Some(Default::default());
        assert_eq!(a.signing_bytes().unwrap(), limited.signing_bytes().unwrap());
    }

    #[test]
    fn equal_payloads_sign_equal_bytes() {
        let a = QuorumTx::new(obs_tx(), true, vec![]);
        let mut b = a.clone();
        b.obs_tx.tx.coins = Coins::new(vec![
            Coin::new(Asset::btc(), 150_000u32),
            Coin::new(Asset::new("ETH.ETH").unwrap(), 7u32),
        ]);
        b.obs_tx.tx.memo = b.obs_tx.tx.memo.to_lowercase();
        let mut c = b.clone();
        c.obs_tx.tx.coins = Coins::new(b.obs_tx.tx.coins.iter().rev().cloned().collect());
        assert!(b.equals(&c));
        assert_eq!(b.signing_bytes().unwrap(), c.signing_bytes().unwrap());
        assert_ne!(a.signing_bytes().unwrap(), b.signing_bytes().unwrap());

        let pk = PubKey::new(VAULT).unwrap();
        let coins = vec![
            Coin::new(Asset::btc(), 10u32),
            Coin::new(Asset::new("ETH.ETH").unwrap(), 20u32),
        ];
        let forward = Solvency::new(
            Chain::unchecked("BTC"),
            pk.clone(),
            Coins::new(coins.clone()),
            5,
        );
        let reversed = Solvency::new(
            Chain::unchecked("BTC"),
            pk,
            Coins::new(coins.into_iter().rev().collect()),
            5,
        );
        let forward = QuorumSolvency::new(forward, vec![]);
        let reversed = QuorumSolvency::new(reversed, vec![]);
        assert!(forward.equals(&reversed));
        assert_eq!(forward.signing_bytes().unwrap(), reversed.signing_bytes().unwrap());
    }

    #[test]
    fn payload_keys() {
        let fee = NetworkFee::new(7, Chain::unchecked("ETH"), 80_000, 30);
        assert_eq!(QuorumNetworkFee::new(fee, vec![]).payload_key(), "fee/ETH/7");

        let pk = PubKey::new(VAULT).unwrap();
        let reserves = |amount: u32| Coins::new(vec![Coin::new(Asset::btc(), amount)]);
        let btc = Chain::unchecked("BTC");
        let s1 = QuorumSolvency::new(Solvency::new(btc.clone(), pk.clone(), reserves(10), 9), vec![]);
        let s2 = QuorumSolvency::new(Solvency::new(btc, pk, reserves(11), 9), vec![]);
        assert_eq!(s1.payload_key(), s2.payload_key());
        assert!(!s1.equals(&s2));
    }
}
