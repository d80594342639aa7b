use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::network::{self, Network};

fn default_true() -> bool {
    true
}

/// Settings the observation core needs from its host process.
///
/// Reading the file is the host's job; this type only parses and applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BifrostConfig {
    /// Network whose chain registry and address parameters apply.
    #[serde(default)]
    pub network: Network,
    /// Keep derived addresses in memory. Disable only for debugging.
    #[serde(default = "default_true")]
    pub address_cache_enabled: bool,
}

impl Default for BifrostConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            address_cache_enabled: true,
        }
    }
}

impl BifrostConfig {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Install `network` as the process-wide network.
    pub fn apply(&self) -> Result<(), CoreError> {
        network::init(self.network)
    }
}
