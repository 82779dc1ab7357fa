//! Preference store abstraction
//!
//! vChewing keeps its settings in the `org.atelierInmu.vChewing` preference
//! domain. The rescue needs to read one string key and delete one boolean key,
//! so the store is modeled as a tiny injected interface: the real backend
//! shells out to `defaults(1)`, and tests use an in-memory map.

use std::collections::HashMap;
use std::process::Command;
use std::sync::Mutex;

use crate::paths::PREF_DOMAIN;

/// Errors from the real preference backend.
#[derive(Debug, thiserror::Error)]
pub enum PrefError {
    #[error("failed to invoke `defaults`: {0}")]
    Invoke(#[from] std::io::Error),
    #[error("`defaults` produced non-UTF-8 output")]
    BadOutput(#[from] std::string::FromUtf8Error),
}

/// Minimal key-value view of an application preference domain.
pub trait PrefStore: Send {
    /// Read a string value. A missing key is `Ok(None)`, not an error.
    fn string(&self, key: &str) -> Result<Option<String>, PrefError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PrefError>;

    /// Force deferred writes out, where the backend defers at all.
    fn flush(&self) -> Result<(), PrefError>;
}

/// Real backend over the `defaults` command-line utility.
///
/// `defaults` exits nonzero when a key or domain does not exist; both read and
/// delete treat that as absence rather than failure.
pub struct DefaultsStore {
    domain: String,
}

impl DefaultsStore {
    pub fn new() -> Self {
        Self::for_domain(PREF_DOMAIN)
    }

    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
        }
    }
}

impl Default for DefaultsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for DefaultsStore {
    fn string(&self, key: &str) -> Result<Option<String>, PrefError> {
        let output = Command::new("defaults")
            .args(["read", &self.domain, key])
            .output()?;

        if !output.status.success() {
            log::debug!("defaults read {} {}: key absent", self.domain, key);
            return Ok(None);
        }

        let value = String::from_utf8(output.stdout)?;
        Ok(Some(value.trim_end_matches('\n').to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), PrefError> {
        let output = Command::new("defaults")
            .args(["delete", &self.domain, key])
            .output()?;

        if !output.status.success() {
            log::debug!("defaults delete {} {}: key absent", self.domain, key);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), PrefError> {
        // `defaults` commits synchronously; nothing deferred to flush.
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().unwrap().contains_key(key)
    }
}

impl PrefStore for MemoryStore {
    fn string(&self, key: &str) -> Result<Option<String>, PrefError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), PrefError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), PrefError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        store.set("UserDataFolderSpecified", "/tmp/data");

        assert_eq!(
            store.string("UserDataFolderSpecified").unwrap().as_deref(),
            Some("/tmp/data")
        );
        assert_eq!(store.string("NoSuchKey").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_is_idempotent() {
        let store = MemoryStore::default();
        store.set("AllowBoostingSingleKanjiAsUserPhrase", "1");

        store.remove("AllowBoostingSingleKanjiAsUserPhrase").unwrap();
        assert!(!store.contains("AllowBoostingSingleKanjiAsUserPhrase"));

        // Absent key: still ok.
        store.remove("AllowBoostingSingleKanjiAsUserPhrase").unwrap();
        store.flush().unwrap();
    }
}
