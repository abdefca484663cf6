//! Settings persistence layer
//!
//! Two settings variants exist, one per definition kind. Each is persisted
//! through its own [`SettingsStore`], addressed by definition id.
//!
//! # Modules
//!
//! - [`types`]: `DefinitionSettings` and its `Static` / `UserDefined` variants
//! - [`store`]: Key-value store trait
//! - [`sqlite`]: SQLite-backed store with one table per variant
//! - [`memory`]: In-process store
//! - [`error`]: Error type for store operations

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::MemorySettingsStore;
pub use sqlite::SqliteSettingsStore;
pub use store::SettingsStore;
pub use types::{
    DefinitionKind, DefinitionSettings, ErrorReportingKind, ServerTrace, StaticSettings,
    UserDefinedSettings,
};
