//! Persisted definition settings

use serde::{Deserialize, Serialize};

use crate::mapping::types::MappingRule;
use crate::reconcile::error::ConfigurationError;

/// How a language server definition was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// Registered statically (configuration or built-in declaration)
    Static,
    /// Authored entirely by the user
    UserDefined,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Static => "static",
            DefinitionKind::UserDefined => "user_defined",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level of protocol tracing requested for a server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTrace {
    #[default]
    Off,
    Messages,
    Verbose,
}

impl ServerTrace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerTrace::Off => "off",
            ServerTrace::Messages => "messages",
            ServerTrace::Verbose => "verbose",
        }
    }
}

impl std::str::FromStr for ServerTrace {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(ServerTrace::Off),
            "messages" => Ok(ServerTrace::Messages),
            "verbose" => Ok(ServerTrace::Verbose),
            _ => Err(()),
        }
    }
}

/// How server errors are reported to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReportingKind {
    #[default]
    AsNotification,
    AsErrorLog,
    None,
}

impl ErrorReportingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReportingKind::AsNotification => "as_notification",
            ErrorReportingKind::AsErrorLog => "as_error_log",
            ErrorReportingKind::None => "none",
        }
    }
}

impl std::str::FromStr for ErrorReportingKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "as_notification" => Ok(ErrorReportingKind::AsNotification),
            "as_error_log" => Ok(ErrorReportingKind::AsErrorLog),
            "none" => Ok(ErrorReportingKind::None),
            _ => Err(()),
        }
    }
}

/// Settings attached to a statically registered definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSettings {
    /// Debug port, empty when debugging is disabled
    pub debug_port: String,
    /// Suspend the server on start and wait for a debugger
    pub debug_suspend: bool,
    pub server_trace: ServerTrace,
    pub report_error_kind: ErrorReportingKind,
}

/// Settings of a user-authored definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedSettings {
    pub display_name: String,
    pub command_line: String,
    pub mappings: Vec<MappingRule>,
    /// JSON text, stored as is
    pub configuration_content: String,
    /// JSON text, stored as is
    pub initialization_options_content: String,
}

/// Content of the JSON text fields when nothing has been configured
pub const EMPTY_JSON_CONTENT: &str = "{}";

impl UserDefinedSettings {
    /// Defaults for a definition that has no persisted record yet
    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            command_line: String::new(),
            mappings: Vec::new(),
            configuration_content: EMPTY_JSON_CONTENT.to_string(),
            initialization_options_content: EMPTY_JSON_CONTENT.to_string(),
        }
    }

    /// Parse the configuration content for a consumer (e.g. `workspace/configuration`)
    pub fn parsed_configuration(&self) -> Result<serde_json::Value, ConfigurationError> {
        parse_content("configurationContent", &self.configuration_content)
    }

    /// Parse the initialization options sent with the `initialize` request
    pub fn parsed_initialization_options(&self) -> Result<serde_json::Value, ConfigurationError> {
        parse_content(
            "initializationOptionsContent",
            &self.initialization_options_content,
        )
    }
}

/// Blank content is treated as an empty object.
fn parse_content(field: &'static str, content: &str) -> Result<serde_json::Value, ConfigurationError> {
    if content.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(content).map_err(|source| ConfigurationError::MalformedContent { field, source })
}

/// Persisted settings of one definition, by variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "definitionKind", rename_all = "snake_case")]
pub enum DefinitionSettings {
    Static(StaticSettings),
    UserDefined(UserDefinedSettings),
}

impl DefinitionSettings {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            DefinitionSettings::Static(_) => DefinitionKind::Static,
            DefinitionSettings::UserDefined(_) => DefinitionKind::UserDefined,
        }
    }
}
