use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::chain::Chain;
use crate::coin::{add_coins, coins_equal, sorted_coins, sub_coins, Coin, Coins};
use crate::constants::EVM_TO_SYSTEM_DIVISOR;
use crate::error::CoreError;

/// Fees paid to a foreign network for one transaction, in 8-decimal units.
///
/// Same arithmetic as `Coins`; every operation returns a new value.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gas(Vec<Coin>);

impl Gas {
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// Fee for an EVM transaction: `gas_units * gas_price_wei (+ l1_fee)`,
    /// converted from 18 to 8 decimals and rounded up. A zero fee becomes
    /// one unit so the solvency requirement is never understated.
    pub fn make_evm(
        chain: &Chain,
        gas_price_wei: &BigUint,
        gas_units: u64,
        l1_fee_wei: Option<&BigUint>,
    ) -> Self {
        let mut wei = gas_price_wei * BigUint::from(gas_units);
        if let Some(l1) = l1_fee_wei {
            wei += l1;
        }
        let divisor = BigUint::from(EVM_TO_SYSTEM_DIVISOR);
        let mut amount = &wei / &divisor;
        let zero = BigUint::default();
        if &wei % &divisor != zero || amount == zero {
            amount += 1u32;
        }
        Self(vec![Coin::new(chain.gas_asset(), amount)])
    }

    pub fn into_inner(self) -> Vec<Coin> {
        self.0
    }

    pub fn add(&self, coins: &[Coin]) -> Self {
        Self(add_coins(&self.0, coins))
    }

    pub fn safe_sub(&self, coins: &[Coin]) -> Self {
        Self(sub_coins(&self.0, coins))
    }

    /// Order-insensitive comparison.
    pub fn equals(&self, other: &[Coin]) -> bool {
        coins_equal(&self.0, other)
    }

    /// Copy in canonical order, for hashing and signing.
    pub fn sorted(&self) -> Self {
        Self(sorted_coins(&self.0))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Coin::is_empty)
    }

    pub fn valid(&self) -> Result<(), CoreError> {
        self.0.iter().try_for_each(Coin::valid)
    }

    pub fn to_coins(&self) -> Coins {
        Coins::new(self.0.clone())
    }
}

impl Deref for Gas {
    type Target = [Coin];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Coin>> for Gas {
    fn from(coins: Vec<Coin>) -> Self {
        Self(coins)
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coins())
    }
}
