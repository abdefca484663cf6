//! Reconciliation of edited views against persisted settings

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::mapping::classifier::classify;
use crate::reconcile::error::ConfigurationError;
use crate::reconcile::view::{ReconciliationView, UserDefinedFields, ViewFields};
use crate::registry::DefinitionRegistry;
use crate::settings::store::SettingsStore;
use crate::settings::types::{
    DefinitionKind, DefinitionSettings, StaticSettings, UserDefinedSettings,
};

/// Loads, compares and commits [`ReconciliationView`]s
///
/// Each definition kind is served by its own store; a definition id is only
/// ever looked up in the store matching its kind.
pub struct ReconciliationEngine {
    static_store: Arc<dyn SettingsStore<StaticSettings>>,
    user_defined_store: Arc<dyn SettingsStore<UserDefinedSettings>>,
    registry: Arc<dyn DefinitionRegistry>,
}

impl ReconciliationEngine {
    pub fn new(
        static_store: Arc<dyn SettingsStore<StaticSettings>>,
        user_defined_store: Arc<dyn SettingsStore<UserDefinedSettings>>,
        registry: Arc<dyn DefinitionRegistry>,
    ) -> Self {
        Self {
            static_store,
            user_defined_store,
            registry,
        }
    }

    /// Get the registry used for mapping lookups and definition updates
    pub fn registry(&self) -> &Arc<dyn DefinitionRegistry> {
        &self.registry
    }

    /// Build a view from the persisted settings, or from defaults when none exist
    ///
    /// Static definitions take their mappings from the registry; user-defined
    /// ones from their persisted record. The stores are not modified.
    pub fn reset(&self, definition_id: &str, kind: DefinitionKind) -> ReconciliationView {
        match kind {
            DefinitionKind::Static => {
                let settings = self.load_static(definition_id).unwrap_or_default();
                let mappings =
                    classify(&self.registry.find_mappings_for_definition(definition_id));
                ReconciliationView::new(definition_id, ViewFields::Static(settings), mappings)
            }
            DefinitionKind::UserDefined => {
                let settings = self.load_user_defined(definition_id).unwrap_or_else(|| {
                    UserDefinedSettings::with_display_name(self.display_name(definition_id))
                });
                let mappings = classify(&settings.mappings);
                ReconciliationView::new(
                    definition_id,
                    ViewFields::UserDefined(UserDefinedFields::from(&settings)),
                    mappings,
                )
            }
        }
    }

    /// Fetch the persisted settings of a definition from the store matching `kind`
    ///
    /// A read failure is logged and reported as a missing record.
    pub fn load(&self, definition_id: &str, kind: DefinitionKind) -> Option<DefinitionSettings> {
        match kind {
            DefinitionKind::Static => self
                .load_static(definition_id)
                .map(DefinitionSettings::Static),
            DefinitionKind::UserDefined => self
                .load_user_defined(definition_id)
                .map(DefinitionSettings::UserDefined),
        }
    }

    /// Returns true when the view differs from the persisted settings
    ///
    /// A definition without a persisted record is always modified, as is a view
    /// built for another definition or kind.
    pub fn is_modified(
        &self,
        definition_id: &str,
        kind: DefinitionKind,
        view: &ReconciliationView,
    ) -> bool {
        if view.definition_id() != definition_id {
            warn!(
                "View for {} compared against definition {}",
                view.definition_id(),
                definition_id
            );
            return true;
        }
        if view.kind() != kind {
            warn!(
                "View for {} holds {} settings but the definition is {}",
                definition_id,
                view.kind(),
                kind
            );
            return true;
        }
        let Some(persisted) = self.load(definition_id, kind) else {
            return true;
        };

        match (persisted, &view.fields) {
            (DefinitionSettings::Static(persisted), ViewFields::Static(fields)) => {
                persisted.debug_port != fields.debug_port
                    || persisted.debug_suspend != fields.debug_suspend
                    || persisted.server_trace != fields.server_trace
                    || persisted.report_error_kind != fields.report_error_kind
            }
            (DefinitionSettings::UserDefined(persisted), ViewFields::UserDefined(fields)) => {
                persisted.display_name != fields.display_name
                    || persisted.command_line != fields.command_line
                    || persisted.configuration_content != fields.configuration_content
                    || persisted.initialization_options_content
                        != fields.initialization_options_content
                    || persisted.mappings != view.merged_mappings()
            }
            _ => true,
        }
    }

    /// Commit the view to the store matching `kind`
    ///
    /// For user-defined definitions the registry is renamed and updated after the
    /// store write succeeds. JSON text fields are stored without validation;
    /// malformed mapping entries are dropped.
    pub fn apply(
        &self,
        definition_id: &str,
        kind: DefinitionKind,
        view: &ReconciliationView,
    ) -> Result<(), ConfigurationError> {
        if view.definition_id() != definition_id {
            return Err(ConfigurationError::DefinitionMismatch {
                definition_id: definition_id.to_string(),
                view_definition_id: view.definition_id().to_string(),
            });
        }
        if view.kind() != kind {
            return Err(ConfigurationError::KindMismatch {
                definition_id: definition_id.to_string(),
                expected: kind,
                actual: view.kind(),
            });
        }
        let persist_failure = |source| ConfigurationError::PersistFailure {
            definition_id: definition_id.to_string(),
            source,
        };

        match view.to_settings() {
            DefinitionSettings::Static(settings) => {
                self.static_store
                    .put(definition_id, settings)
                    .map_err(persist_failure)?;
                info!("Applied static settings for {}", definition_id);
            }
            DefinitionSettings::UserDefined(settings) => {
                self.user_defined_store
                    .put(definition_id, settings.clone())
                    .map_err(persist_failure)?;

                if let Some(definition) = self.registry.definition(definition_id)
                    && definition.display_name != settings.display_name
                {
                    self.registry
                        .rename_definition(definition_id, &settings.display_name);
                }
                self.registry.update_definition(
                    definition_id,
                    &settings.command_line,
                    &settings.mappings,
                    &settings.configuration_content,
                    &settings.initialization_options_content,
                );
                info!(
                    "Applied user defined settings for {} ({} mappings)",
                    definition_id,
                    settings.mappings.len()
                );
            }
        }
        Ok(())
    }

    fn load_static(&self, definition_id: &str) -> Option<StaticSettings> {
        match self.static_store.get(definition_id) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to read static settings for {}: {}", definition_id, e);
                None
            }
        }
    }

    fn load_user_defined(&self, definition_id: &str) -> Option<UserDefinedSettings> {
        match self.user_defined_store.get(definition_id) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Failed to read user defined settings for {}: {}",
                    definition_id, e
                );
                None
            }
        }
    }

    fn display_name(&self, definition_id: &str) -> String {
        self.registry
            .definition(definition_id)
            .map(|definition| definition.display_name)
            .unwrap_or_else(|| {
                debug!("No registered definition {}, using id as name", definition_id);
                definition_id.to_string()
            })
    }
}
