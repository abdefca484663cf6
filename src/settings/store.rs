//! Key-value store trait for definition settings

#[cfg(test)]
use mockall::automock;

use crate::settings::error::StoreError;

/// Trait for persisting one settings variant, addressed by definition id
///
/// One store exists per variant. Implementations must make `put` atomic with
/// respect to `get`: a reader sees either the previous record or the new one.
#[cfg_attr(test, automock)]
pub trait SettingsStore<S: Send + Sync + 'static>: Send + Sync {
    /// Get the record for a definition
    ///
    /// # Returns
    /// * `Ok(Some(settings))` - The persisted record
    /// * `Ok(None)` - No record has been written for this id yet
    /// * `Err(StoreError)` - The backing medium could not be read
    fn get(&self, definition_id: &str) -> Result<Option<S>, StoreError>;

    /// Replace the record for a definition (last writer wins)
    fn put(&self, definition_id: &str, settings: S) -> Result<(), StoreError>;
}
