use std::collections::HashMap;

use bifrost_core::{network, Address, BifrostConfig, Chain, Network, PubKey, PubKeySet};
use tracing::{debug, warn};

use crate::cache::AddressCache;
use crate::codec::{default_codec, AddressCodec};
use crate::error::AddressError;

/// Maps (pubkey, chain) to the chain's native address.
///
/// Holds one codec per chain and the cache of derived addresses. Chains
/// without a codec resolve to the empty address rather than an error.
pub struct AddressService {
    network: Network,
    codecs: HashMap<Chain, Box<dyn AddressCodec>>,
    cache: AddressCache,
}

impl AddressService {
    /// Service with the default codecs for every chain registered on
    /// `network` and an enabled cache.
    pub fn new(network: Network) -> Self {
        Self::with_cache(network, AddressCache::default())
    }

    /// Service for `config.network`, cache per `config`.
    pub fn from_config(config: &BifrostConfig) -> Self {
        Self::with_cache(config.network, AddressCache::new(config.address_cache_enabled))
    }

    /// Service for [`network::current`].
    pub fn for_current_network() -> Self {
        Self::new(network::current())
    }

    pub fn with_cache(network: Network, cache: AddressCache) -> Self {
        let mut codecs: HashMap<Chain, Box<dyn AddressCodec>> = HashMap::new();
        for chain in Chain::registered(network) {
            match default_codec(&chain, network) {
                Ok(Some(codec)) => {
                    codecs.insert(chain, codec);
                }
                Ok(None) => {}
                Err(e) => warn!(chain = %chain, error = %e, "no default address codec"),
            }
        }
        debug!(network = %network, codecs = codecs.len(), "address service ready");
        Self {
            network,
            codecs,
            cache,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn cache(&self) -> &AddressCache {
        &self.cache
    }

    /// Install `codec` for `chain`, returning the one it replaces. Cached
    /// addresses for the chain are kept; call [`AddressCache::invalidate`]
    /// when the encoding changes.
    pub fn register(
        &mut self,
        chain: Chain,
        codec: Box<dyn AddressCodec>,
    ) -> Option<Box<dyn AddressCodec>> {
        self.codecs.insert(chain, codec)
    }

    pub fn supports(&self, chain: &Chain) -> bool {
        self.codecs.contains_key(chain)
    }

    /// Address of `pubkey` on `chain`.
    ///
    /// An empty pubkey or a chain with no codec gives the empty address.
    pub fn get_address(&self, pubkey: &PubKey, chain: &Chain) -> Result<Address, AddressError> {
        if pubkey.is_empty() {
            return Ok(Address::empty());
        }
        let Some(codec) = self.codecs.get(chain) else {
            debug!(chain = %chain, "no address codec for chain");
            return Ok(Address::empty());
        };
        self.cache.get_or_try_insert_with(chain, pubkey, || {
            let address = codec
                .derive(pubkey)
                .map_err(|e| AddressError::from_codec(e, chain, pubkey))?;
            debug!(chain = %chain, pubkey = %pubkey, address = %address, "derived address");
            Ok(address)
        })
    }

    /// Address on `chain` of whichever key in `set` signs for it.
    pub fn get_address_for_set(
        &self,
        set: &PubKeySet,
        chain: &Chain,
    ) -> Result<Address, AddressError> {
        self.get_address(set.key_for_chain(chain), chain)
    }
}

impl Default for AddressService {
    fn default() -> Self {
        Self::for_current_network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifrost_core::SigningAlgorithm;
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    use crate::error::CodecError;

    const SECP_PUBKEY: &str =
        "thorpub1addwnpepqfumuen7l8wthtz45p3ftn58pvrs9xlumvkuu2xet8egzkcklqtesc6p3ea";
    const ED_PUBKEY: &str =
        "thorpub1zcjduepq6adfsqvzky9t042tlmfujeq88g8wzuhnm2nzxfd0qgdx3ac82ydqd2var8";

    fn chain(code: &str) -> Chain {
        Chain::unchecked(code)
    }

    fn secp() -> PubKey {
        PubKey::new(SECP_PUBKEY).unwrap()
    }

    #[test]
    fn mainnet_vectors() {
        let svc = AddressService::new(Network::Mainnet);
        let pk = secp();
        for (code, want) in [
            ("THOR", "thor1w508d6qejxtdg4y5r3zarvary0c5xw7ku6wp68"),
            ("GAIA", "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"),
            ("BTC", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            ("LTC", "ltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kgmn4n9"),
            ("DOGE", "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE"),
            ("BCH", "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            ("ETH", "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            ("BSC", "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            ("AVAX", "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            ("BASE", "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"),
            ("XRP", "rBgGZ9tc4him9KBzD8fKFiQz3fSZpaSwMH"),
            ("TRON", "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC"),
        ] {
            assert_eq!(svc.get_address(&pk, &chain(code)).unwrap().as_str(), want, "{code}");
        }
    }

    #[test]
    fn network_parameters() {
        let pk = secp();
        let stage = AddressService::new(Network::Stagenet);
        assert_eq!(
            stage.get_address(&pk, &chain("THOR")).unwrap().as_str(),
            "sthor1w508d6qejxtdg4y5r3zarvary0c5xw7kgrjhve"
        );

        let mock = AddressService::new(Network::Mocknet);
        for (code, want) in [
            ("THOR", "tthor1w508d6qejxtdg4y5r3zarvary0c5xw7kcdl3rz"),
            ("BTC", "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080"),
            ("LTC", "rltc1qw508d6qejxtdg4y5r3zarvary0c5xw7k693xs3"),
            ("DOGE", "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r"),
            ("BCH", "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r"),
        ] {
            assert_eq!(mock.get_address(&pk, &chain(code)).unwrap().as_str(), want, "{code}");
        }
        // Not run on mocknet.
        assert!(!mock.supports(&chain("SOL")));
        assert!(mock.get_address(&pk, &chain("TRON")).unwrap().is_empty());
    }

    #[test]
    fn from_config_follows_configured_network() {
        let config =
            BifrostConfig::from_json(r#"{"network":"stagenet","address_cache_enabled":false}"#)
                .unwrap();
        let svc = AddressService::from_config(&config);
        assert_eq!(svc.network(), Network::Stagenet);
        assert!(!svc.cache().is_enabled());
        assert_eq!(
            svc.get_address(&secp(), &chain("THOR")).unwrap().as_str(),
            "sthor1w508d6qejxtdg4y5r3zarvary0c5xw7kgrjhve"
        );
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn pubkey_set_picks_key_by_algorithm() {
        let svc = AddressService::new(Network::Mainnet);
        let set = PubKeySet::new(secp(), PubKey::new(ED_PUBKEY).unwrap());
        assert_eq!(
            svc.get_address_for_set(&set, &chain("SOL")).unwrap().as_str(),
            "FVen3X669xLzsi6N2V91DoiyzHzg1uAgqiT8jZ9nS96Z"
        );
        assert_eq!(
            svc.get_address_for_set(&set, &chain("BTC")).unwrap().as_str(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn soft_failures_give_empty_address() {
        let svc = AddressService::new(Network::Mainnet);
        assert!(svc.get_address(&PubKey::empty(), &chain("BTC")).unwrap().is_empty());
        assert!(svc.get_address(&secp(), &chain("XYZ")).unwrap().is_empty());
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn wrong_algorithm_carries_context() {
        let svc = AddressService::new(Network::Mainnet);
        let ed = PubKey::new(ED_PUBKEY).unwrap();
        match svc.get_address(&ed, &chain("ETH")) {
            Err(AddressError::AlgorithmMismatch {
                chain: c,
                pubkey,
                expected,
                got,
            }) => {
                assert_eq!(c, chain("ETH"));
                assert_eq!(pubkey, ed);
                assert_eq!(expected, SigningAlgorithm::Secp256k1);
                assert_eq!(got, SigningAlgorithm::Ed25519);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn off_curve_key_is_malformed() {
        // Valid bech32 envelope around bytes that are not a curve point.
        let mut raw = vec![0x02];
        raw.extend_from_slice(&[0xff; 32]);
        let pk = PubKey::from_key_bytes("thorpub", SigningAlgorithm::Secp256k1, &raw).unwrap();
        let svc = AddressService::new(Network::Mainnet);
        let err = svc.get_address(&pk, &chain("BTC")).unwrap_err();
        assert!(matches!(err, AddressError::MalformedPubKey { .. }));
        assert!(err.to_string().contains("BTC"));
    }

    #[test]
    fn derivation_is_deterministic_and_cached_per_chain() {
        let svc = AddressService::new(Network::Mainnet);
        let mut rng = rand::thread_rng();
        for _ in 0..8 {
            let secret = k256::SecretKey::random(&mut rng);
            let raw = secret.public_key().to_encoded_point(true);
            let pk =
                PubKey::from_key_bytes("thorpub", SigningAlgorithm::Secp256k1, raw.as_bytes())
                    .unwrap();
            let btc = svc.get_address(&pk, &chain("BTC")).unwrap();
            assert_eq!(svc.get_address(&pk, &chain("BTC")).unwrap(), btc);
            let ltc = svc.get_address(&pk, &chain("LTC")).unwrap();
            assert_ne!(btc, ltc);
            assert_eq!(svc.cache().get(&chain("BTC"), &pk), Some(btc));
        }
        assert_eq!(svc.cache().len(), 16);
        svc.cache().invalidate();
        assert!(svc.cache().is_empty());
    }

    struct Fixed;

    impl AddressCodec for Fixed {
        fn algorithm(&self) -> SigningAlgorithm {
            SigningAlgorithm::Secp256k1
        }

        fn encode(&self, _key: &[u8]) -> Result<Address, CodecError> {
            Ok(Address::new("fixed"))
        }
    }

    #[test]
    fn registered_codec_extends_service() {
        let mut svc = AddressService::with_cache(Network::Mainnet, AddressCache::new(false));
        let xyz = chain("XYZ");
        assert!(svc.register(xyz.clone(), Box::new(Fixed)).is_none());
        assert_eq!(svc.get_address(&secp(), &xyz).unwrap().as_str(), "fixed");
        assert!(svc.register(xyz, Box::new(Fixed)).is_some());
        assert!(svc.cache().is_empty());
    }
}
