//! Settings reconciliation layer
//!
//! Keeps an editable view of a definition's settings in sync with the
//! persisted record of its kind.
//!
//! ```text
//! ┌─────────────┐ reset  ┌─────────────┐ edit  ┌─────────────┐
//! │    Store    │───────▶│    View     │◀──────│   Editor    │
//! │ (per kind)  │◀───────│ (classified │       │ (external)  │
//! └─────────────┘ apply  │  mappings)  │       └─────────────┘
//!        ▲               └─────────────┘
//!        │ is_modified          │
//!        └──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`engine`]: `reset`, `is_modified` and `apply`
//! - [`view`]: The editable view
//! - [`session`]: Loaded/Dirty session wrapper around one view
//! - [`error`]: Error type for reconciliation

pub mod engine;
pub mod error;
pub mod session;
pub mod view;

pub use engine::ReconciliationEngine;
pub use error::ConfigurationError;
pub use session::{EditingSession, SessionState};
pub use view::{ReconciliationView, UserDefinedFields, ViewFields};
