use thiserror::Error;

use crate::settings::error::StoreError;
use crate::settings::types::DefinitionKind;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The store write failed; the previously persisted record is untouched
    #[error("Failed to persist settings for {definition_id}: {source}")]
    PersistFailure {
        definition_id: String,
        #[source]
        source: StoreError,
    },

    #[error("Definition {definition_id} is {expected} but the view holds {actual} settings")]
    KindMismatch {
        definition_id: String,
        expected: DefinitionKind,
        actual: DefinitionKind,
    },

    #[error("View for {view_definition_id} cannot be applied to {definition_id}")]
    DefinitionMismatch {
        definition_id: String,
        view_definition_id: String,
    },

    /// Raised by consumers of the JSON text fields, never by `apply`
    #[error("Malformed JSON in {field}: {source}")]
    MalformedContent {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
