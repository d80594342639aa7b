//! Three observers watch the same inbound BTC deposit, attest to it, and
//! the aggregator releases it once two of them agree.

use bifrost_core::{
    Address, Asset, Chain, Coin, Coins, Gas, Network, NetworkFee, ObservedTx, PubKey,
    SigningAlgorithm, Status, Tx, TxId,
};
use bifrost_crypto::AddressService;
use bifrost_quorum::{
    Attestation, AttestationAggregator, PayloadId, QuorumNetworkFee, QuorumTx, QuorumWrapper,
    SupermajorityPolicy,
};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use num_bigint::BigUint;

const USER: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Observer {
    key: SigningKey,
    address: Address,
}

impl Observer {
    fn new(svc: &AddressService) -> Self {
        let key = SigningKey::random(&mut rand::thread_rng());
        let pk = pubkey_of(&key);
        let address = svc.get_address(&pk, &Chain::thorchain()).unwrap();
        Self { key, address }
    }

    fn attest<Q: QuorumWrapper>(&self, wrapper: &mut Q) {
        let message = wrapper.signing_bytes().unwrap();
        let signature: Signature = self.key.sign(&message);
        wrapper.add_attestation(Attestation::new(
            self.key.verifying_key().to_encoded_point(true).as_bytes(),
            signature.to_bytes().as_slice(),
        ));
    }
}

fn pubkey_of(key: &SigningKey) -> PubKey {
    let point = key.verifying_key().to_encoded_point(true);
    PubKey::from_key_bytes("thorpub", SigningAlgorithm::Secp256k1, point.as_bytes()).unwrap()
}

fn deposit(vault: &PubKey, svc: &AddressService, signer: &Address) -> ObservedTx {
    let vault_address = svc.get_address(vault, &Chain::unchecked("BTC")).unwrap();
    let tx = Tx::new(
        TxId::new(&"5a".repeat(32)).unwrap(),
        Chain::unchecked("BTC"),
        Address::new(USER),
        vault_address,
        Coins::new(vec![Coin::new(Asset::btc(), 2_000_000u32)]),
        Gas::new(vec![Coin::new(Asset::btc(), 1_500u32)]),
        "=:ETH.ETH:0x7e5f4552091a69125d5dfcb7b8c2659029395bdf",
    );
    let mut obs = ObservedTx::new(tx, 850_000, vault.clone(), 850_000);
    obs.aggregator_target_limit = Some(BigUint::from(0u32));
    obs.sign(signer.clone());
    obs
}

#[test]
fn inbound_deposit_reaches_quorum() {
    init_tracing();
    let svc = AddressService::new(Network::Mainnet);
    let vault = pubkey_of(&SigningKey::random(&mut rand::thread_rng()));
    let observers: Vec<Observer> = (0..3).map(|_| Observer::new(&svc)).collect();
    let policy = SupermajorityPolicy::new(observers.len());

    let mut agg = AttestationAggregator::new();
    let mut id = None;
    let mut released = None;
    for observer in &observers {
        let obs = deposit(&vault, &svc, &observer.address);
        assert!(obs.valid().is_ok());
        let mut wrapper = QuorumTx::new(obs, true, Vec::new());
        observer.attest(&mut wrapper);

        let outcome = agg.submit(wrapper);
        id = Some(outcome.id);
        if let Some(agreed) = agg.take_if_quorum(&outcome.id, &policy).unwrap() {
            released = Some(agreed);
            break;
        }
    }

    let agreed: QuorumTx = released.expect("two of three observers agree");
    assert_eq!(agreed.get_attestations().len(), 2);
    assert_eq!(agg.pending_count(), 0);
    assert_eq!(id, Some(PayloadId::of(&agreed)));

    // Every attestation verifies against the agreed payload.
    let message = agreed.signing_bytes().unwrap();
    for attestation in agreed.get_attestations() {
        let key = VerifyingKey::from_sec1_bytes(&attestation.pub_key).unwrap();
        let signature = Signature::from_slice(&attestation.signature).unwrap();
        assert!(key.verify(&message, &signature).is_ok());
    }

    // Outbound legs complete the observation.
    let mut obs = agreed.obs_tx;
    for observer in &observers[1..] {
        obs.sign(observer.address.clone());
    }
    assert_eq!(obs.signers.len(), 3);
    assert!(obs.is_final());
    obs.set_done(TxId::new(&"6b".repeat(32)).unwrap(), 2);
    assert_eq!(obs.status, Status::Incomplete);
    obs.set_done(TxId::blank(), 2);
    assert_eq!(obs.status, Status::Done);
}

#[test]
fn late_attestation_for_released_payload_is_absorbed() {
    let svc = AddressService::new(Network::Mainnet);
    let observers: Vec<Observer> = (0..2).map(|_| Observer::new(&svc)).collect();
    let fee = NetworkFee::new(850_000, Chain::unchecked("BTC"), 250, 12);

    let mut agg = AttestationAggregator::new();
    let mut first = QuorumNetworkFee::new(fee.clone(), Vec::new());
    observers[0].attest(&mut first);
    let id = agg.submit(first).id;
    assert!(agg
        .take_if_quorum(&id, &SupermajorityPolicy::new(1))
        .unwrap()
        .is_some());

    let mut late = QuorumNetworkFee::new(fee, Vec::new());
    observers[1].attest(&mut late);
    let outcome = agg.submit(late);
    assert_eq!(outcome.id, id);
    assert!(outcome.already_released);
    assert_eq!(agg.pending_count(), 0);
}

#[test]
fn disagreeing_observer_does_not_block_quorum() {
    init_tracing();
    let svc = AddressService::new(Network::Mainnet);
    let observers: Vec<Observer> = (0..4).map(|_| Observer::new(&svc)).collect();
    let policy = SupermajorityPolicy::new(observers.len());
    let height = 850_000;

    let mut agg = AttestationAggregator::new();
    let mut wrong = QuorumNetworkFee::new(
        NetworkFee::new(height, Chain::unchecked("BTC"), 250, 99),
        Vec::new(),
    );
    observers[0].attest(&mut wrong);
    let id = agg.submit(wrong).id;

    let mut released = None;
    for observer in &observers[1..] {
        let mut honest = QuorumNetworkFee::new(
            NetworkFee::new(height, Chain::unchecked("BTC"), 250, 12),
            Vec::new(),
        );
        observer.attest(&mut honest);
        let outcome = agg.submit(honest);
        assert_eq!(outcome.id, id);
        assert_eq!(outcome.candidates, 2);
        released = agg.take_if_quorum(&id, &policy).unwrap();
    }

    let agreed = released.expect("three of four observers agree");
    assert_eq!(agreed.network_fee.transaction_fee_rate, 12);
    assert_eq!(agreed.get_attestations().len(), 3);
    assert!(agg.is_released(&id));
    assert_eq!(agg.pending_count(), 0);
}
