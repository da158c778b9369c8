//! Handle Registry
//!
//! Maps caller-chosen keys to the records the API layer retains for them.
//! The registry itself is not synchronized: it lives inside the API state
//! and is only touched while the process-wide lock is held.
//!
//! # Contract
//!
//! - [`create`](HandleRegistry::create) fails with
//!   [`ApiError::AlreadyExists`] when the key is live, leaving the existing
//!   record untouched.
//! - [`destroy`](HandleRegistry::destroy) of an absent key is a no-op.
//! - The null key (zero / empty name) is never accepted.

use rustc_hash::FxHashMap;

use crate::errors::{ApiError, Result};
use crate::handle::RegistryKey;

pub struct HandleRegistry<K: RegistryKey, V> {
    entries: FxHashMap<K, V>,
}

impl<K: RegistryKey, V> Default for HandleRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RegistryKey, V> HandleRegistry<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Fails with the matching null-key error if `key` is reserved.
    pub fn check_key(key: &K) -> Result<()> {
        if key.is_null() {
            return Err(K::null_error());
        }
        Ok(())
    }

    /// Fails if `key` is null or already registered. Does not insert.
    pub fn check_vacant(&self, key: &K) -> Result<()> {
        Self::check_key(key)?;
        if self.entries.contains_key(key) {
            return Err(ApiError::AlreadyExists {
                kind: K::KIND,
                key: key.describe(),
            });
        }
        Ok(())
    }

    /// Registers `value` under `key`.
    pub fn create(&mut self, key: K, value: V) -> Result<()> {
        self.check_vacant(&key)?;
        self.entries.insert(key, value);
        Ok(())
    }

    /// Removes `key`, returning the record if it was live.
    ///
    /// Destroying an unknown key is not an error.
    pub fn destroy(&mut self, key: &K) -> Option<V> {
        let removed = self.entries.remove(key);
        if removed.is_none() {
            log::debug!("destroy of unknown {} {}: no-op", K::KIND, key.describe());
        }
        removed
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Fails with [`ApiError::UnknownHandle`] unless `key` is live.
    pub fn require(&self, key: &K) -> Result<&V>
    where
        K: Copy + Into<u64>,
    {
        Self::check_key(key)?;
        self.entries.get(key).ok_or_else(|| ApiError::UnknownHandle {
            kind: K::KIND,
            handle: (*key).into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}
