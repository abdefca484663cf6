//! In-process settings store

use std::collections::HashMap;
use std::sync::RwLock;

use crate::settings::error::StoreError;
use crate::settings::store::SettingsStore;

/// Settings store kept in memory, for embedding without a database
#[derive(Debug)]
pub struct MemorySettingsStore<S> {
    records: RwLock<HashMap<String, S>>,
}

impl<S> Default for MemorySettingsStore<S> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> MemorySettingsStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl<S: Clone + Send + Sync + 'static> SettingsStore<S> for MemorySettingsStore<S> {
    fn get(&self, definition_id: &str) -> Result<Option<S>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.get(definition_id).cloned())
    }

    fn put(&self, definition_id: &str, settings: S) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        records.insert(definition_id.to_string(), settings);
        Ok(())
    }
}
