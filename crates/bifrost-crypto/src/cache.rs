use std::collections::HashMap;

use bifrost_core::{Address, Chain, PubKey};
use parking_lot::Mutex;

/// Derived addresses keyed by chain and pubkey text.
///
/// Created with its [`crate::AddressService`] and cleared only through
/// [`AddressCache::invalidate`]. A disabled cache stores nothing and always
/// misses.
#[derive(Debug)]
pub struct AddressCache {
    enabled: bool,
    entries: Mutex<HashMap<(Chain, String), Address>>,
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AddressCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, chain: &Chain, pubkey: &PubKey) -> Option<Address> {
        if !self.enabled {
            return None;
        }
        self.entries
            .lock()
            .get(&(chain.clone(), pubkey.as_str().to_string()))
            .cloned()
    }

    /// Return the cached address or run `derive` and store its result.
    ///
    /// The lock is held across `derive`, so concurrent callers for the same
    /// key derive once. Errors are not cached.
    pub fn get_or_try_insert_with<E, F>(
        &self,
        chain: &Chain,
        pubkey: &PubKey,
        derive: F,
    ) -> Result<Address, E>
    where
        F: FnOnce() -> Result<Address, E>,
    {
        if !self.enabled {
            return derive();
        }
        let mut entries = self.entries.lock();
        let key = (chain.clone(), pubkey.as_str().to_string());
        if let Some(address) = entries.get(&key) {
            return Ok(address.clone());
        }
        let address = derive()?;
        entries.insert(key, address.clone());
        Ok(address)
    }

    /// Drop every entry.
    pub fn invalidate(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
