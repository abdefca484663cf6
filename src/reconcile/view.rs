//! Editable settings view

use serde::Serialize;

use crate::mapping::classifier::{ClassifiedMappings, merge, retain_well_formed};
use crate::mapping::types::MappingRule;
use crate::settings::types::{
    DefinitionKind, DefinitionSettings, StaticSettings, UserDefinedSettings,
};

/// Scalar fields of a user-defined definition as edited in a view
///
/// Mappings are not part of this struct; the view holds them classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedFields {
    pub display_name: String,
    pub command_line: String,
    pub configuration_content: String,
    pub initialization_options_content: String,
}

impl From<&UserDefinedSettings> for UserDefinedFields {
    fn from(settings: &UserDefinedSettings) -> Self {
        Self {
            display_name: settings.display_name.clone(),
            command_line: settings.command_line.clone(),
            configuration_content: settings.configuration_content.clone(),
            initialization_options_content: settings.initialization_options_content.clone(),
        }
    }
}

/// Edited scalar fields, by definition kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "definitionKind", rename_all = "snake_case")]
pub enum ViewFields {
    Static(StaticSettings),
    UserDefined(UserDefinedFields),
}

impl ViewFields {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            ViewFields::Static(_) => DefinitionKind::Static,
            ViewFields::UserDefined(_) => DefinitionKind::UserDefined,
        }
    }
}

/// In-memory editing surface for one definition's settings
///
/// The view is owned by the caller and passed into each engine operation.
/// It is the only thing an editor mutates; nothing is persisted until `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationView {
    definition_id: String,
    pub fields: ViewFields,
    pub mappings: ClassifiedMappings,
}

impl ReconciliationView {
    pub fn new(
        definition_id: impl Into<String>,
        fields: ViewFields,
        mappings: ClassifiedMappings,
    ) -> Self {
        Self {
            definition_id: definition_id.into(),
            fields,
            mappings,
        }
    }

    /// Id of the definition the view was created for
    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn kind(&self) -> DefinitionKind {
        self.fields.kind()
    }

    pub fn static_fields(&self) -> Option<&StaticSettings> {
        match &self.fields {
            ViewFields::Static(fields) => Some(fields),
            ViewFields::UserDefined(_) => None,
        }
    }

    pub fn static_fields_mut(&mut self) -> Option<&mut StaticSettings> {
        match &mut self.fields {
            ViewFields::Static(fields) => Some(fields),
            ViewFields::UserDefined(_) => None,
        }
    }

    pub fn user_defined_fields(&self) -> Option<&UserDefinedFields> {
        match &self.fields {
            ViewFields::UserDefined(fields) => Some(fields),
            ViewFields::Static(_) => None,
        }
    }

    pub fn user_defined_fields_mut(&mut self) -> Option<&mut UserDefinedFields> {
        match &mut self.fields {
            ViewFields::UserDefined(fields) => Some(fields),
            ViewFields::Static(_) => None,
        }
    }

    /// The classified mappings flattened in persistence order
    ///
    /// Entries edited into malformed rules (empty key or language id) are left out.
    pub fn merged_mappings(&self) -> Vec<MappingRule> {
        retain_well_formed(merge(&self.mappings))
    }

    /// The settings record this view would persist
    ///
    /// Static views carry no mappings of their own; theirs come from the registry.
    pub fn to_settings(&self) -> DefinitionSettings {
        match &self.fields {
            ViewFields::Static(fields) => DefinitionSettings::Static(fields.clone()),
            ViewFields::UserDefined(fields) => DefinitionSettings::UserDefined(UserDefinedSettings {
                display_name: fields.display_name.clone(),
                command_line: fields.command_line.clone(),
                mappings: self.merged_mappings(),
                configuration_content: fields.configuration_content.clone(),
                initialization_options_content: fields.initialization_options_content.clone(),
            }),
        }
    }
}
