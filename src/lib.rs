//! Settings reconciliation for language server definitions
//!
//! # Modules
//!
//! - [`mapping`]: Mapping rules and their classification by criterion kind
//! - [`settings`]: Persisted settings variants and their stores
//! - [`registry`]: Language server definitions and their declared mappings
//! - [`reconcile`]: Editable views, the reconciliation engine and sessions
//! - [`config`]: Paths and the configuration file
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod logging;
pub mod mapping;
pub mod reconcile;
pub mod registry;
pub mod settings;
