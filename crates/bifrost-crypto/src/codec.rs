//! Per-family address encoders.
//!
//! Every codec turns the raw key bytes carried by a [`PubKey`] into the
//! chain's native address text. Codecs are stateless apart from their
//! network parameters and can be shared freely across threads.

use bech32::{Bech32, Hrp};
use bifrost_core::{Address, Chain, ChainFamily, Network, PubKey, SigningAlgorithm};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::error::CodecError;
use crate::hash::{hash160, keccak256};

/// Base58check version byte for TRON account addresses.
const TRON_ADDRESS_VERSION: u8 = 0x41;
/// Base58check version byte for XRP account ids.
const XRP_ACCOUNT_VERSION: u8 = 0x00;

/// Derives one chain's address from a public key.
pub trait AddressCodec: Send + Sync {
    /// Algorithm the key must use for this chain.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Encode raw key bytes of [`Self::algorithm`].
    fn encode(&self, key: &[u8]) -> Result<Address, CodecError>;

    fn derive(&self, pubkey: &PubKey) -> Result<Address, CodecError> {
        let (got, key) = pubkey
            .decode()
            .map_err(|e| CodecError::MalformedKey(e.to_string()))?;
        let expected = self.algorithm();
        if got != expected {
            return Err(CodecError::AlgorithmMismatch { expected, got });
        }
        self.encode(&key)
    }
}

/// SEC1 point, compressed (`02`/`03`) or uncompressed (`04`) only.
fn secp256k1_key(key: &[u8]) -> Result<k256::PublicKey, CodecError> {
    match key.first() {
        Some(0x02 | 0x03 | 0x04) => {}
        Some(tag) => {
            return Err(CodecError::MalformedKey(format!(
                "unsupported SEC1 tag {tag:#04x}"
            )))
        }
        None => return Err(CodecError::MalformedKey("empty secp256k1 key".into())),
    }
    k256::PublicKey::from_sec1_bytes(key)
        .map_err(|e| CodecError::MalformedKey(format!("secp256k1 point: {e}")))
}

/// Last 20 bytes of keccak256 over the uncompressed point, format byte dropped.
fn eth_account(key: &[u8]) -> Result<[u8; 20], CodecError> {
    let point = secp256k1_key(key)?.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut account = [0u8; 20];
    account.copy_from_slice(&digest[12..]);
    Ok(account)
}

/// Compressed SEC1 form, whatever encoding the caller supplied.
fn compressed(key: &[u8]) -> Result<Vec<u8>, CodecError> {
    Ok(secp256k1_key(key)?.to_encoded_point(true).as_bytes().to_vec())
}

fn parse_hrp(hrp: &str) -> Result<Hrp, CodecError> {
    Hrp::parse(hrp).map_err(|e| CodecError::Encoding(format!("hrp {hrp}: {e}")))
}

// ── EVM ──────────────────────────────────────────────────────────────────────

/// `0x` + lowercase hex of the Ethereum account.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvmCodec;

impl AddressCodec for EvmCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        Ok(Address::new(format!("0x{}", hex::encode(eth_account(key)?))))
    }
}

// ── Cosmos ───────────────────────────────────────────────────────────────────

/// Bech32 of RIPEMD160(SHA256(compressed key)).
#[derive(Clone, Debug)]
pub struct CosmosCodec {
    hrp: Hrp,
}

impl CosmosCodec {
    pub fn new(hrp: &str) -> Result<Self, CodecError> {
        Ok(Self { hrp: parse_hrp(hrp)? })
    }
}

impl AddressCodec for CosmosCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let account = hash160(&compressed(key)?);
        bech32::encode::<Bech32>(self.hrp, &account)
            .map(Address::new)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }
}

// ── Segwit ───────────────────────────────────────────────────────────────────

/// Native segwit v0 pay-to-witness-pubkey-hash.
#[derive(Clone, Debug)]
pub struct SegwitCodec {
    hrp: Hrp,
}

impl SegwitCodec {
    pub fn new(hrp: &str) -> Result<Self, CodecError> {
        Ok(Self { hrp: parse_hrp(hrp)? })
    }
}

impl AddressCodec for SegwitCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let program = hash160(&compressed(key)?);
        bech32::segwit::encode_v0(self.hrp, &program)
            .map(Address::new)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }
}

// ── P2PKH ────────────────────────────────────────────────────────────────────

/// Legacy base58check pay-to-pubkey-hash.
#[derive(Clone, Copy, Debug)]
pub struct P2pkhCodec {
    version: u8,
}

impl P2pkhCodec {
    pub fn new(version: u8) -> Self {
        Self { version }
    }

    /// BCH legacy addresses.
    pub fn bitcoin_cash(network: Network) -> Self {
        Self::new(if network.is_test() { 0x6f } else { 0x00 })
    }

    pub fn dogecoin(network: Network) -> Self {
        Self::new(if network.is_test() { 0x6f } else { 0x1e })
    }

    pub fn version(&self) -> u8 {
        self.version
    }
}

impl AddressCodec for P2pkhCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let hash = hash160(&compressed(key)?);
        Ok(Address::new(
            bs58::encode(hash).with_check_version(self.version).into_string(),
        ))
    }
}

// ── XRP ──────────────────────────────────────────────────────────────────────

/// Classic XRP account address: base58check over the ripple alphabet.
#[derive(Clone, Copy, Debug, Default)]
pub struct XrpCodec;

impl AddressCodec for XrpCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let account = hash160(&compressed(key)?);
        Ok(Address::new(
            bs58::encode(account)
                .with_alphabet(bs58::Alphabet::RIPPLE)
                .with_check_version(XRP_ACCOUNT_VERSION)
                .into_string(),
        ))
    }
}

// ── TRON ─────────────────────────────────────────────────────────────────────

/// Ethereum account bytes under TRON's `0x41` version, base58check.
#[derive(Clone, Copy, Debug, Default)]
pub struct TronCodec;

impl AddressCodec for TronCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Secp256k1
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let account = eth_account(key)?;
        Ok(Address::new(
            bs58::encode(account)
                .with_check_version(TRON_ADDRESS_VERSION)
                .into_string(),
        ))
    }
}

// ── Solana ───────────────────────────────────────────────────────────────────

/// The ed25519 key itself, base58 without checksum.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolanaCodec;

impl AddressCodec for SolanaCodec {
    fn algorithm(&self) -> SigningAlgorithm {
        SigningAlgorithm::Ed25519
    }

    fn encode(&self, key: &[u8]) -> Result<Address, CodecError> {
        let bytes: [u8; 32] = key.try_into().map_err(|_| {
            CodecError::MalformedKey(format!("ed25519 key must be 32 bytes, got {}", key.len()))
        })?;
        let verifying = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CodecError::MalformedKey(format!("ed25519 point: {e}")))?;
        Ok(Address::new(bs58::encode(verifying.as_bytes()).into_string()))
    }
}

/// Codec for a registered chain on `network`, or `None` when the chain has
/// no address family.
pub fn default_codec(
    chain: &Chain,
    network: Network,
) -> Result<Option<Box<dyn AddressCodec>>, CodecError> {
    let Some(family) = chain.family() else {
        return Ok(None);
    };
    let codec: Box<dyn AddressCodec> = match family {
        ChainFamily::Cosmos => Box::new(CosmosCodec::new(chain.address_prefix(network))?),
        ChainFamily::Segwit => Box::new(SegwitCodec::new(chain.address_prefix(network))?),
        ChainFamily::P2pkh => match chain.as_str() {
            "DOGE" => Box::new(P2pkhCodec::dogecoin(network)),
            _ => Box::new(P2pkhCodec::bitcoin_cash(network)),
        },
        ChainFamily::Evm => Box::new(EvmCodec),
        ChainFamily::Xrp => Box::new(XrpCodec),
        ChainFamily::Tron => Box::new(TronCodec),
        ChainFamily::Solana => Box::new(SolanaCodec),
    };
    Ok(Some(codec))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECP_G: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const ED_KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    fn secp() -> Vec<u8> {
        hex::decode(SECP_G).unwrap()
    }

    #[test]
    fn evm_address_is_lowercase_hex() {
        assert_eq!(
            EvmCodec.encode(&secp()).unwrap().as_str(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn uncompressed_input_gives_same_address() {
        let uncompressed = k256::PublicKey::from_sec1_bytes(&secp())
            .unwrap()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        let codec = SegwitCodec::new("bc").unwrap();
        assert_eq!(codec.encode(&uncompressed), codec.encode(&secp()));
    }

    #[test]
    fn cosmos_prefixes() {
        for (hrp, want) in [
            ("thor", "thor1w508d6qejxtdg4y5r3zarvary0c5xw7ku6wp68"),
            ("sthor", "sthor1w508d6qejxtdg4y5r3zarvary0c5xw7kgrjhve"),
            ("tthor", "tthor1w508d6qejxtdg4y5r3zarvary0c5xw7kcdl3rz"),
            ("cosmos", "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"),
        ] {
            let codec = CosmosCodec::new(hrp).unwrap();
            assert_eq!(codec.encode(&secp()).unwrap().as_str(), want);
        }
    }

    #[test]
    fn segwit_prefixes() {
        for (hrp, want) in [
            ("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            ("bcrt", "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080"),
            ("ltc", "ltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kgmn4n9"),
            ("rltc", "rltc1qw508d6qejxtdg4y5r3zarvary0c5xw7k693xs3"),
        ] {
            let codec = SegwitCodec::new(hrp).unwrap();
            assert_eq!(codec.encode(&secp()).unwrap().as_str(), want);
        }
    }

    #[test]
    fn base58_families() {
        let key = secp();
        assert_eq!(
            P2pkhCodec::dogecoin(Network::Mainnet).encode(&key).unwrap().as_str(),
            "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE"
        );
        assert_eq!(
            P2pkhCodec::bitcoin_cash(Network::Mainnet).encode(&key).unwrap().as_str(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(
            P2pkhCodec::dogecoin(Network::Mocknet).encode(&key).unwrap().as_str(),
            "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r"
        );
        assert_eq!(
            XrpCodec.encode(&key).unwrap().as_str(),
            "rBgGZ9tc4him9KBzD8fKFiQz3fSZpaSwMH"
        );
        assert_eq!(
            TronCodec.encode(&key).unwrap().as_str(),
            "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC"
        );
    }

    #[test]
    fn solana_uses_raw_key() {
        let key = hex::decode(ED_KEY).unwrap();
        assert_eq!(
            SolanaCodec.encode(&key).unwrap().as_str(),
            "FVen3X669xLzsi6N2V91DoiyzHzg1uAgqiT8jZ9nS96Z"
        );
        assert!(matches!(
            SolanaCodec.encode(&key[..31]),
            Err(CodecError::MalformedKey(_))
        ));
    }

    #[test]
    fn off_curve_secp_key_is_malformed() {
        // x = 2^256 - 1 exceeds the field modulus.
        let mut key = vec![0x02];
        key.extend_from_slice(&[0xff; 32]);
        assert!(matches!(EvmCodec.encode(&key), Err(CodecError::MalformedKey(_))));
    }

    #[test]
    fn only_standard_sec1_tags_are_accepted() {
        let mut compact = secp();
        compact[0] = 0x05;
        assert!(matches!(EvmCodec.encode(&compact), Err(CodecError::MalformedKey(_))));
        let mut hybrid = secp();
        hybrid[0] = 0x06;
        assert!(matches!(
            SegwitCodec::new("bc").unwrap().encode(&hybrid),
            Err(CodecError::MalformedKey(_))
        ));
        assert!(matches!(TronCodec.encode(&[]), Err(CodecError::MalformedKey(_))));
    }

    #[test]
    fn derive_checks_algorithm() {
        let pk = PubKey::from_key_bytes(
            "thorpub",
            SigningAlgorithm::Ed25519,
            &hex::decode(ED_KEY).unwrap(),
        )
        .unwrap();
        assert_eq!(
            EvmCodec.derive(&pk),
            Err(CodecError::AlgorithmMismatch {
                expected: SigningAlgorithm::Secp256k1,
                got: SigningAlgorithm::Ed25519,
            })
        );
        assert!(SolanaCodec.derive(&pk).is_ok());
    }

    #[test]
    fn default_codecs_follow_network() {
        let btc = Chain::unchecked("BTC");
        let main = default_codec(&btc, Network::Mainnet).unwrap().unwrap();
        let mock = default_codec(&btc, Network::Mocknet).unwrap().unwrap();
        assert!(main.encode(&secp()).unwrap().as_str().starts_with("bc1"));
        assert!(mock.encode(&secp()).unwrap().as_str().starts_with("bcrt1"));
        assert!(default_codec(&Chain::unchecked("XYZ"), Network::Mainnet)
            .unwrap()
            .is_none());
    }
}
