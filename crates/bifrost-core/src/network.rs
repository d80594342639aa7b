use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::CoreError;

/// The deployment a node is running against.
///
/// Mainnet and Stagenet observe the same foreign networks; Stagenet only
/// differs in the native chain's address prefix. Mocknet runs every foreign
/// chain in regtest/dev mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Stagenet,
    Mocknet,
}

impl Network {
    pub fn is_test(&self) -> bool {
        matches!(self, Network::Mocknet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Stagenet => "stagenet",
            Network::Mocknet => "mocknet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static CURRENT: OnceCell<Network> = OnceCell::new();

/// Fix the process-wide network. May be called once; repeating the call with
/// the same network is a no-op.
pub fn init(network: Network) -> Result<(), CoreError> {
    let current = *CURRENT.get_or_init(|| {
        info!(network = %network, "configured network");
        network
    });
    if current != network {
        return Err(CoreError::NetworkAlreadySet {
            current: current.to_string(),
            requested: network.to_string(),
        });
    }
    Ok(())
}

/// The configured network, Mainnet until `init` runs.
pub fn current() -> Network {
    CURRENT.get().copied().unwrap_or_default()
}
