//! In-memory credential store.

use super::obfuscation::{deobfuscate, obfuscate};
use super::store::CredentialStore;
use crate::error::{MobiwallError, Result};
use std::sync::RwLock;

/// Keeps the obfuscated record in process memory.
///
/// Useful for tests and for sessions that should not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `key`.
    pub fn with_key(key: &str) -> Self {
        let record = (!key.is_empty()).then(|| obfuscate(key));
        Self {
            record: RwLock::new(record),
        }
    }

    /// Returns the stored record exactly as persisted.
    pub fn raw_record(&self) -> Option<String> {
        self.record.read().ok().and_then(|record| record.clone())
    }

    /// Replaces the stored record with arbitrary text.
    pub fn set_raw_record(&self, record: impl Into<String>) {
        if let Ok(mut slot) = self.record.write() {
            *slot = Some(record.into());
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, key: &str) -> Result<()> {
        let mut slot = self
            .record
            .write()
            .map_err(|_| MobiwallError::Storage("credential store lock poisoned".into()))?;
        *slot = if key.is_empty() {
            None
        } else {
            Some(obfuscate(key))
        };
        Ok(())
    }

    fn load(&self) -> Option<String> {
        self.raw_record().map(|record| deobfuscate(&record))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let store = MemoryCredentialStore::new();
        for key in ["good-key", "AIzaSy_abc-123", " padded ", "키"] {
            store.save(key).unwrap();
            assert_eq!(store.load().as_deref(), Some(key));
        }
    }

    #[test]
    fn test_save_empty_clears_regardless_of_prior_state() {
        let store = MemoryCredentialStore::new();
        store.save("").unwrap();
        assert_eq!(store.load(), None);

        store.save("good-key").unwrap();
        store.save("").unwrap();
        assert_eq!(store.load(), None);
        assert_eq!(store.raw_record(), None);
    }

    #[test]
    fn test_record_is_obfuscated() {
        let store = MemoryCredentialStore::with_key("good-key");
        assert_eq!(store.raw_record().as_deref(), Some("Z29vZC1rZXk="));
    }

    #[test]
    fn test_malformed_record_loads_raw() {
        let store = MemoryCredentialStore::new();
        store.set_raw_record("%%%");
        assert_eq!(store.load().as_deref(), Some("%%%"));
    }
}
