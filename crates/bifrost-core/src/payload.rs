use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::coin::Coins;
use crate::error::CoreError;
use crate::pubkey::PubKey;
use crate::tx::TxId;

// ── NetworkFee ───────────────────────────────────────────────────────────────

/// Fee conditions observed on a foreign chain at a given height.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkFee {
    pub height: i64,
    pub chain: Chain,
    /// Typical transaction size in the chain's gas units.
    pub transaction_size: u64,
    /// Fee rate per unit of size.
    pub transaction_fee_rate: u64,
}

impl NetworkFee {
    pub fn new(height: i64, chain: Chain, transaction_size: u64, transaction_fee_rate: u64) -> Self {
        Self {
            height,
            chain,
            transaction_size,
            transaction_fee_rate,
        }
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        if self.height <= 0 {
            return Err(CoreError::validation(format!(
                "network fee height must be positive, got {}",
                self.height
            )));
        }
        self.chain.valid()?;
        if self.transaction_size == 0 {
            return Err(CoreError::validation("network fee transaction size cannot be zero"));
        }
        if self.transaction_fee_rate == 0 {
            return Err(CoreError::validation("network fee rate cannot be zero"));
        }
        Ok(())
    }
}

// ── Solvency ─────────────────────────────────────────────────────────────────

/// A vault's reserves on one chain at a given height, as reported by an
/// observer.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Solvency {
    /// BLAKE3 digest of the other fields.
    pub id: TxId,
    pub chain: Chain,
    pub pub_key: PubKey,
    pub coins: Coins,
    pub height: i64,
}

impl Solvency {
    pub fn new(chain: Chain, pub_key: PubKey, coins: Coins, height: i64) -> Self {
        let id = Self::compute_id(&chain, &pub_key, &coins, height);
        Self {
            id,
            chain,
            pub_key,
            coins,
            height,
        }
    }

    /// Content id. Coin order and asset case do not affect it.
    pub fn compute_id(chain: &Chain, pub_key: &PubKey, coins: &Coins, height: i64) -> TxId {
        let reserves = coins.sorted().to_string().to_ascii_uppercase();
        let mut hasher = blake3::Hasher::new();
        hasher.update(chain.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(pub_key.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(reserves.as_bytes());
        hasher.update(b"|");
        hasher.update(&height.to_le_bytes());
        // A 32-byte digest always forms a valid hex id.
        TxId::new(&hasher.finalize().to_hex()).unwrap_or_default()
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::validation("solvency id cannot be empty"));
        }
        self.chain.valid()?;
        if self.pub_key.is_empty() {
            return Err(CoreError::validation("solvency pubkey cannot be empty"));
        }
        if self.height <= 0 {
            return Err(CoreError::validation(format!(
                "solvency height must be positive, got {}",
                self.height
            )));
        }
        if self.id != Self::compute_id(&self.chain, &self.pub_key, &self.coins, self.height) {
            return Err(CoreError::validation(format!(
                "solvency id {} does not match its contents",
                self.id
            )));
        }
        Ok(())
    }

    pub fn equals(&self, other: &Solvency) -> bool {
        self.id == other.id
            && self.chain == other.chain
            && self.pub_key == other.pub_key
            && self.height == other.height
            && self.coins.equals_ex(&other.coins)
    }
}

// ── ErrataTx ─────────────────────────────────────────────────────────────────

/// Claim that a previously observed transaction was erroneous (e.g. dropped
/// by a chain reorg) and must be reverted.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrataTx {
    pub id: TxId,
    pub chain: Chain,
}

impl ErrataTx {
    pub fn new(id: TxId, chain: Chain) -> Self {
        Self { id, chain }
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::validation("errata tx id cannot be empty"));
        }
        self.chain.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::coin::Coin;

    const VAULT: &str =
        "thorpub1addwnpepqfumuen7l8wthtz45p3ftn58pvrs9xlumvkuu2xet8egzkcklqtesc6p3ea";

    #[test]
    fn network_fee_validation() {
        let btc = Chain::unchecked("BTC");
        assert!(NetworkFee::new(100, btc.clone(), 250, 25).valid().is_ok());
        let err = NetworkFee::new(0, btc.clone(), 250, 25).valid().unwrap_err();
        assert!(err.to_string().contains("height must be positive"));
        assert!(NetworkFee::new(100, btc.clone(), 0, 25).valid().is_err());
        assert!(NetworkFee::new(100, btc, 250, 0).valid().is_err());
        assert_eq!(
            NetworkFee::new(100, Chain::unchecked("XYZ"), 250, 25).valid(),
            Err(CoreError::UnsupportedChain("XYZ".into()))
        );
    }

    #[test]
    fn solvency_id_is_content_addressed() {
        let coins = Coins::new(vec![Coin::new(Asset::btc(), 1_000u32)]);
        let pk = PubKey::new(VAULT).unwrap();
        let a = Solvency::new(Chain::unchecked("BTC"), pk.clone(), coins.clone(), 50);
        let b = Solvency::new(Chain::unchecked("BTC"), pk.clone(), coins.clone(), 51);
        assert_eq!(a.id.as_str().len(), 64);
        assert_ne!(a.id, b.id);
        assert!(a.valid().is_ok());
        assert!(a.equals(&a.clone()));
        assert!(!a.equals(&b));

        let mut tampered = a.clone();
        tampered.coins = Coins::new(vec![Coin::new(Asset::btc(), 9u32)]);
        assert!(tampered.valid().unwrap_err().to_string().contains("does not match"));
    }

    #[test]
    fn solvency_id_ignores_coin_order() {
        let pk = PubKey::new(VAULT).unwrap();
        let btc = Coin::new(Asset::btc(), 1_000u32);
        let eth = Coin::new(Asset::eth(), 2_000u32);
        let a = Solvency::new(
            Chain::unchecked("BTC"),
            pk.clone(),
            Coins::new(vec![btc.clone(), eth.clone()]),
            50,
        );
        let b = Solvency::new(Chain::unchecked("BTC"), pk, Coins::new(vec![eth, btc]), 50);
        assert_eq!(a.id, b.id);
        assert!(a.equals(&b));
        assert!(b.valid().is_ok());
    }

    #[test]
    fn errata_validation() {
        let id = TxId::new(&"ab".repeat(32)).unwrap();
        assert!(ErrataTx::new(id.clone(), Chain::unchecked("ETH")).valid().is_ok());
        assert!(ErrataTx::new(TxId::default(), Chain::unchecked("ETH")).valid().is_err());
    }
}
