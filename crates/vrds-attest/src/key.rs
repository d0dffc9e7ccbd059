//! Verification keys, the key cache and attester configuration.

use crate::program::Fingerprint;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binds a program fingerprint to the attester allowed to vouch for it.
/// Distributed out of band to anyone who wants to check attestations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationKey {
    program: Fingerprint,
    #[serde(with = "hex::serde")]
    attester: [u8; 32],
}

impl VerificationKey {
    pub fn new(program: Fingerprint, attester: [u8; 32]) -> Self {
        VerificationKey { program, attester }
    }

    pub fn program(&self) -> Fingerprint {
        self.program
    }

    pub fn attester(&self) -> &[u8; 32] {
        &self.attester
    }
}

/// Compiled keys indexed by program fingerprint.
#[derive(Debug, Default)]
pub struct KeyCache {
    keys: RwLock<HashMap<Fingerprint, VerificationKey>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, program: &Fingerprint) -> Option<VerificationKey> {
        self.keys.read().get(program).copied()
    }

    /// Return the cached key, compiling it with `compile` on a miss.
    pub fn get_or_insert_with(
        &self,
        program: Fingerprint,
        compile: impl FnOnce() -> VerificationKey,
    ) -> VerificationKey {
        if let Some(key) = self.get(&program) {
            return key;
        }
        *self.keys.write().entry(program).or_insert_with(compile)
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.keys.write().clear();
    }
}

/// Configuration for a [`crate::SigningAttester`].
#[derive(Debug, Default)]
pub struct ServiceConfig {
    /// Fixed signing seed. `None` draws a fresh key from the OS.
    pub seed: Option<[u8; 32]>,
    /// Label attached to log events from this attester.
    pub label: String,
    pub key_cache: KeyCache,
}

/// Builder for service configuration.
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ServiceConfig {
                label: "attester".to_string(),
                ..ServiceConfig::default()
            },
        }
    }

    pub fn seed(mut self, seed: [u8; 32]) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    pub fn key_cache(mut self, cache: KeyCache) -> Self {
        self.config.key_cache = cache;
        self
    }

    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ProgramDescriptor;

    #[test]
    fn test_cache_compiles_once() {
        let cache = KeyCache::new();
        let fp = ProgramDescriptor::new("p", &["m"]).fingerprint();

        let first = cache.get_or_insert_with(fp, || VerificationKey::new(fp, [1u8; 32]));
        let second = cache.get_or_insert_with(fp, || panic!("cached key was recompiled"));

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_clear() {
        let cache = KeyCache::new();
        let fp = ProgramDescriptor::new("p", &["m"]).fingerprint();
        cache.get_or_insert_with(fp, || VerificationKey::new(fp, [2u8; 32]));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.get(&fp).is_none());
    }

    #[test]
    fn test_builder() {
        let config = ServiceConfigBuilder::new().seed([9u8; 32]).label("node-a").build();
        assert_eq!(config.seed, Some([9u8; 32]));
        assert_eq!(config.label, "node-a");
        assert!(config.key_cache.is_empty());
    }
}
