//! Registry of language server definitions
//!
//! The reconciliation engine consumes the registry through [`DefinitionRegistry`]:
//! static definitions declare their mappings here, and user-defined definitions
//! are renamed and updated here when their settings are applied.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::mapping::types::MappingRule;
use crate::settings::error::StoreError;
use crate::settings::sqlite::SqliteSettingsStore;
use crate::settings::types::{DefinitionKind, UserDefinedSettings};

/// Launch details of a user-defined definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfiguration {
    pub command_line: String,
    pub configuration_content: String,
    pub initialization_options_content: String,
}

/// A registered language server definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageServerDefinition {
    pub id: String,
    pub display_name: String,
    pub kind: DefinitionKind,
    pub mappings: Vec<MappingRule>,
    /// `None` for static definitions
    pub launch: Option<LaunchConfiguration>,
}

impl LanguageServerDefinition {
    pub fn new_static(
        id: impl Into<String>,
        display_name: impl Into<String>,
        mappings: Vec<MappingRule>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: DefinitionKind::Static,
            mappings,
            launch: None,
        }
    }

    pub fn new_user_defined(id: impl Into<String>, settings: &UserDefinedSettings) -> Self {
        Self {
            id: id.into(),
            display_name: settings.display_name.clone(),
            kind: DefinitionKind::UserDefined,
            mappings: settings.mappings.clone(),
            launch: Some(LaunchConfiguration {
                command_line: settings.command_line.clone(),
                configuration_content: settings.configuration_content.clone(),
                initialization_options_content: settings.initialization_options_content.clone(),
            }),
        }
    }
}

/// Operations the reconciliation engine needs from the definition registry
#[cfg_attr(test, automock)]
pub trait DefinitionRegistry: Send + Sync {
    /// Look up a definition by id
    fn definition(&self, definition_id: &str) -> Option<LanguageServerDefinition>;

    /// Mapping rules declared for a definition, empty when unknown
    fn find_mappings_for_definition(&self, definition_id: &str) -> Vec<MappingRule>;

    /// Change the display name of a definition
    fn rename_definition(&self, definition_id: &str, new_display_name: &str);

    /// Replace the launch details and mappings of a user-defined definition
    fn update_definition(
        &self,
        definition_id: &str,
        command_line: &str,
        mappings: &[MappingRule],
        configuration_content: &str,
        initialization_options_content: &str,
    );
}

/// In-process registry keeping definitions in registration order
#[derive(Debug, Default)]
pub struct LanguageServersRegistry {
    definitions: RwLock<IndexMap<String, LanguageServerDefinition>>,
}

impl LanguageServersRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding the statically declared definitions of `config`
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = Self::new();
        for declared in &config.definitions {
            if declared.id.is_empty() {
                warn!("Skipping static definition without id");
                continue;
            }
            let display_name = if declared.name.is_empty() {
                declared.id.clone()
            } else {
                declared.name.clone()
            };
            let mappings = declared
                .mappings
                .iter()
                .cloned()
                .map(MappingRule::from)
                .collect();
            registry.register(LanguageServerDefinition::new_static(
                declared.id.clone(),
                display_name,
                mappings,
            ));
        }
        info!("Registered {} static definitions", registry.read().len());
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, LanguageServerDefinition>> {
        self.definitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, LanguageServerDefinition>> {
        self.definitions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a definition, replacing any definition with the same id.
    /// Returns true when an existing definition was replaced.
    pub fn register(&self, definition: LanguageServerDefinition) -> bool {
        debug!("Registering {} definition {}", definition.kind, definition.id);
        self.write()
            .insert(definition.id.clone(), definition)
            .is_some()
    }

    /// Register a user-authored definition from its settings
    pub fn register_user_defined(
        &self,
        definition_id: &str,
        settings: &UserDefinedSettings,
    ) -> bool {
        self.register(LanguageServerDefinition::new_user_defined(definition_id, settings))
    }

    /// Register every user-defined definition persisted in `store`
    pub fn load_user_defined(&self, store: &SqliteSettingsStore) -> Result<usize, StoreError> {
        let mut loaded = 0;
        for definition_id in store.user_defined_ids()? {
            if let Some(settings) = store.get_user_defined(&definition_id)? {
                self.register_user_defined(&definition_id, &settings);
                loaded += 1;
            }
        }
        info!("Loaded {} user defined definitions", loaded);
        Ok(loaded)
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> Vec<LanguageServerDefinition> {
        self.read().values().cloned().collect()
    }

    /// Definitions selecting a file, as `(definition_id, language_id)` pairs
    ///
    /// The first matching rule of each definition decides its language id.
    pub fn definitions_for_file(
        &self,
        file_name: &str,
        language: Option<&str>,
        file_type: Option<&str>,
    ) -> Vec<(String, String)> {
        self.read()
            .values()
            .filter_map(|definition| {
                definition
                    .mappings
                    .iter()
                    .find(|rule| rule.selects(file_name, language, file_type))
                    .map(|rule| (definition.id.clone(), rule.language_id.clone()))
            })
            .collect()
    }
}

impl DefinitionRegistry for LanguageServersRegistry {
    fn definition(&self, definition_id: &str) -> Option<LanguageServerDefinition> {
        self.read().get(definition_id).cloned()
    }

    fn find_mappings_for_definition(&self, definition_id: &str) -> Vec<MappingRule> {
        self.read()
            .get(definition_id)
            .map(|definition| definition.mappings.clone())
            .unwrap_or_default()
    }

    fn rename_definition(&self, definition_id: &str, new_display_name: &str) {
        match self.write().get_mut(definition_id) {
            Some(definition) => {
                info!(
                    "Renaming definition {} from '{}' to '{}'",
                    definition_id, definition.display_name, new_display_name
                );
                definition.display_name = new_display_name.to_string();
            }
            None => warn!("Cannot rename unknown definition {}", definition_id),
        }
    }

    fn update_definition(
        &self,
        definition_id: &str,
        command_line: &str,
        mappings: &[MappingRule],
        configuration_content: &str,
        initialization_options_content: &str,
    ) {
        let mut definitions = self.write();
        let Some(definition) = definitions.get_mut(definition_id) else {
            warn!("Cannot update unknown definition {}", definition_id);
            return;
        };
        if definition.kind != DefinitionKind::UserDefined {
            warn!("Refusing to update static definition {}", definition_id);
            return;
        }

        definition.mappings = mappings.to_vec();
        definition.launch = Some(LaunchConfiguration {
            command_line: command_line.to_string(),
            configuration_content: configuration_content.to_string(),
            initialization_options_content: initialization_options_content.to_string(),
        });
        debug!("Updated definition {}", definition_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MappingRuleConfig, StaticDefinitionConfig};
    use rstest::rstest;
    use tempfile::TempDir;

    fn registry() -> LanguageServersRegistry {
        let registry = LanguageServersRegistry::new();
        registry.register(LanguageServerDefinition::new_static(
            "rust-analyzer",
            "Rust Analyzer",
            vec![
                MappingRule::language("Rust", "rust"),
                MappingRule::file_name_patterns(["*.rs"], "rust"),
            ],
        ));
        registry.register_user_defined(
            "pyls",
            &UserDefinedSettings {
                mappings: vec![MappingRule::file_name_patterns(["*.py"], "python")],
                command_line: "pylsp".to_string(),
                ..UserDefinedSettings::with_display_name("Python LSP")
            },
        );
        registry
    }

    #[test]
    fn from_config_registers_declared_definitions_in_order() {
        let config = AppConfig {
            definitions: vec![
                StaticDefinitionConfig {
                    id: "zls".to_string(),
                    name: String::new(),
                    mappings: vec![],
                },
                StaticDefinitionConfig {
                    id: "clangd".to_string(),
                    name: "Clangd".to_string(),
                    mappings: vec![MappingRuleConfig {
                        file_type: Some("C".to_string()),
                        language_id: "c".to_string(),
                        ..MappingRuleConfig::default()
                    }],
                },
                StaticDefinitionConfig::default(),
            ],
            ..AppConfig::default()
        };

        let registry = LanguageServersRegistry::from_config(&config);
        let definitions = registry.definitions();

        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].id, "zls");
        assert_eq!(definitions[0].display_name, "zls");
        assert_eq!(definitions[1].kind, DefinitionKind::Static);
        assert_eq!(
            registry.find_mappings_for_definition("clangd"),
            vec![MappingRule::file_type("C", "c")]
        );
    }

    #[test]
    fn find_mappings_for_unknown_definition_is_empty() {
        assert!(registry().find_mappings_for_definition("gopls").is_empty());
    }

    #[test]
    fn rename_definition_changes_display_name() {
        let registry = registry();

        registry.rename_definition("pyls", "Python");

        assert_eq!(registry.definition("pyls").unwrap().display_name, "Python");
    }

    #[test]
    fn update_definition_replaces_launch_and_mappings() {
        let registry = registry();
        let mappings = vec![MappingRule::language("Python", "python")];

        registry.update_definition("pyls", "pylsp --verbose", &mappings, "{\"a\":1}", "{}");

        let definition = registry.definition("pyls").unwrap();
        assert_eq!(definition.mappings, mappings);
        assert_eq!(
            definition.launch,
            Some(LaunchConfiguration {
                command_line: "pylsp --verbose".to_string(),
                configuration_content: "{\"a\":1}".to_string(),
                initialization_options_content: "{}".to_string(),
            })
        );
    }

    #[test]
    fn update_definition_ignores_static_definition() {
        let registry = registry();

        registry.update_definition("rust-analyzer", "ra", &[], "{}", "{}");

        let definition = registry.definition("rust-analyzer").unwrap();
        assert_eq!(definition.launch, None);
        assert_eq!(definition.mappings.len(), 2);
    }

    #[rstest]
    #[case("main.rs", None, None, vec![("rust-analyzer", "rust")])]
    #[case("build.gradle", Some("Rust"), None, vec![("rust-analyzer", "rust")])]
    #[case("app.py", None, None, vec![("pyls", "python")])]
    #[case("README.md", None, None, vec![])]
    fn definitions_for_file_returns_expected(
        #[case] file_name: &str,
        #[case] language: Option<&str>,
        #[case] file_type: Option<&str>,
        #[case] expected: Vec<(&str, &str)>,
    ) {
        let expected: Vec<(String, String)> = expected
            .into_iter()
            .map(|(id, language_id)| (id.to_string(), language_id.to_string()))
            .collect();

        assert_eq!(
            registry().definitions_for_file(file_name, language, file_type),
            expected
        );
    }

    #[test]
    fn load_user_defined_registers_persisted_definitions() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteSettingsStore::new(&temp_dir.path().join("test.db")).unwrap();
        store
            .put_user_defined("zls", &UserDefinedSettings::with_display_name("Zig"))
            .unwrap();
        let registry = LanguageServersRegistry::new();

        assert_eq!(registry.load_user_defined(&store).unwrap(), 1);
        let definition = registry.definition("zls").unwrap();
        assert_eq!(definition.kind, DefinitionKind::UserDefined);
        assert_eq!(definition.display_name, "Zig");
    }
}
