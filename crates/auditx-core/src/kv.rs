//! Key-value persistence seam.
//!
//! The engine durably holds two JSON blobs (the configuration map and the
//! fieldwork record map) behind this trait. Implementations are injected
//! into the repositories at construction time.

use std::collections::HashMap;

use crate::errors::Result;

/// Persisted key-value store of string blobs
pub trait KvStore {
    /// Read the blob stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durably write `value` under `key`, replacing any prior blob
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// HashMap-backed store: the default for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
