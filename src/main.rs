use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use lsp_settings::config::{config_path, db_path, load_config, log_path};
use lsp_settings::logging::init_logging;
use lsp_settings::mapping::{FileNamePatternMapping, FileTypeMapping, LanguageMapping};
use lsp_settings::reconcile::{EditingSession, ReconciliationEngine, ReconciliationView, ViewFields};
use lsp_settings::registry::{
    DefinitionRegistry, LanguageServerDefinition, LanguageServersRegistry,
};
use lsp_settings::settings::{
    DefinitionKind, ErrorReportingKind, ServerTrace, SqliteSettingsStore, UserDefinedSettings,
};

#[derive(Parser)]
#[command(name = "lsp-settings")]
#[command(version, about = "Manage language server definition settings")]
struct Cli {
    /// Configuration file (defaults to the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Settings database (defaults to the data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered definitions
    List,
    /// Print the settings view of a definition
    Show { id: String },
    /// Edit the settings of a definition and apply them when changed
    Set {
        id: String,
        #[command(flatten)]
        edits: Edits,
    },
    /// Register a user-defined language server
    Create {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        command_line: String,
    },
    /// Add a mapping rule to a user-defined language server
    #[command(group(
        ArgGroup::new("criterion")
            .required(true)
            .args(["language", "file_type", "patterns"])
    ))]
    Map {
        id: String,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        language: Option<String>,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        file_type: Option<String>,
        #[arg(long = "pattern", num_args = 1.., value_parser = NonEmptyStringValueParser::new())]
        patterns: Vec<String>,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        language_id: String,
    },
    /// List definitions selecting a file
    Match {
        file_name: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        file_type: Option<String>,
    },
}

#[derive(clap::Args)]
struct Edits {
    #[arg(long)]
    debug_port: Option<String>,
    #[arg(long)]
    debug_suspend: Option<bool>,
    #[arg(long)]
    trace: Option<TraceArg>,
    #[arg(long)]
    report_error_kind: Option<ReportErrorKindArg>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    command_line: Option<String>,
    /// Configuration JSON, stored as is
    #[arg(long)]
    configuration: Option<String>,
    /// Initialization options JSON, stored as is
    #[arg(long)]
    initialization_options: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TraceArg {
    Off,
    Messages,
    Verbose,
}

impl From<TraceArg> for ServerTrace {
    fn from(arg: TraceArg) -> Self {
        match arg {
            TraceArg::Off => ServerTrace::Off,
            TraceArg::Messages => ServerTrace::Messages,
            TraceArg::Verbose => ServerTrace::Verbose,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
enum ReportErrorKindArg {
    AsNotification,
    AsErrorLog,
    None,
}

impl From<ReportErrorKindArg> for ErrorReportingKind {
    fn from(arg: ReportErrorKindArg) -> Self {
        match arg {
            ReportErrorKindArg::AsNotification => ErrorReportingKind::AsNotification,
            ReportErrorKindArg::AsErrorLog => ErrorReportingKind::AsErrorLog,
            ReportErrorKindArg::None => ErrorReportingKind::None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config_path);
    let config = load_config(&config_path)?;
    let _guard = init_logging(&log_path(), &config.log_level)?;

    let db_path = cli.db.unwrap_or_else(db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    let store = Arc::new(SqliteSettingsStore::new(&db_path)?);
    let registry = Arc::new(LanguageServersRegistry::from_config(&config));
    registry.load_user_defined(&store)?;
    let engine = ReconciliationEngine::new(store.clone(), store, registry.clone());

    match cli.command {
        Command::List => {
            for definition in registry.definitions() {
                println!(
                    "{}\t{}\t{}",
                    definition.id, definition.kind, definition.display_name
                );
            }
        }
        Command::Show { id } => {
            let definition = find_definition(&registry, &id)?;
            let view = engine.reset(&id, definition.kind);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Set { id, edits } => {
            let definition = find_definition(&registry, &id)?;
            let mut session = EditingSession::open(&engine, &id, definition.kind);
            session.edit(|view| apply_edits(view, edits))?;
            commit(&mut session)?;
        }
        Command::Create {
            id,
            name,
            command_line,
        } => {
            if registry.definition(&id).is_some() {
                bail!("Definition {} already exists", id);
            }
            let name = name.unwrap_or_else(|| id.clone());
            registry.register_user_defined(&id, &UserDefinedSettings::with_display_name(name));
            let mut session = EditingSession::open(&engine, &id, DefinitionKind::UserDefined);
            session.edit(|view| {
                if let Some(fields) = view.user_defined_fields_mut() {
                    fields.command_line = command_line;
                }
            });
            commit(&mut session)?;
        }
        Command::Map {
            id,
            language,
            file_type,
            patterns,
            language_id,
        } => {
            let definition = find_definition(&registry, &id)?;
            if definition.kind != DefinitionKind::UserDefined {
                bail!("Mappings of static definition {} are declared in the config file", id);
            }
            let mut session = EditingSession::open(&engine, &id, definition.kind);
            session.edit(|view| {
                if let Some(language) = language {
                    view.mappings.languages.push(LanguageMapping {
                        language,
                        language_id,
                    });
                } else if let Some(file_type) = file_type {
                    view.mappings.file_types.push(FileTypeMapping {
                        file_type,
                        language_id,
                    });
                } else {
                    view.mappings
                        .file_name_patterns
                        .push(FileNamePatternMapping {
                            patterns,
                            language_id,
                        });
                }
            });
            commit(&mut session)?;
        }
        Command::Match {
            file_name,
            language,
            file_type,
        } => {
            for (id, language_id) in registry.definitions_for_file(
                &file_name,
                language.as_deref(),
                file_type.as_deref(),
            ) {
                println!("{}\t{}", id, language_id);
            }
        }
    }

    Ok(())
}

fn find_definition(
    registry: &LanguageServersRegistry,
    id: &str,
) -> anyhow::Result<LanguageServerDefinition> {
    registry
        .definition(id)
        .with_context(|| format!("Unknown language server definition {}", id))
}

fn apply_edits(view: &mut ReconciliationView, edits: Edits) -> anyhow::Result<()> {
    match &mut view.fields {
        ViewFields::Static(fields) => {
            if edits.name.is_some()
                || edits.command_line.is_some()
                || edits.configuration.is_some()
                || edits.initialization_options.is_some()
            {
                bail!("Static definitions only accept debug, trace and error reporting settings");
            }
            if let Some(debug_port) = edits.debug_port {
                fields.debug_port = debug_port;
            }
            if let Some(debug_suspend) = edits.debug_suspend {
                fields.debug_suspend = debug_suspend;
            }
            if let Some(trace) = edits.trace {
                fields.server_trace = trace.into();
            }
            if let Some(kind) = edits.report_error_kind {
                fields.report_error_kind = kind.into();
            }
        }
        ViewFields::UserDefined(fields) => {
            if edits.debug_port.is_some()
                || edits.debug_suspend.is_some()
                || edits.trace.is_some()
                || edits.report_error_kind.is_some()
            {
                bail!("User-defined definitions do not accept debug, trace or error reporting settings");
            }
            if let Some(name) = edits.name {
                fields.display_name = name;
            }
            if let Some(command_line) = edits.command_line {
                fields.command_line = command_line;
            }
            if let Some(configuration) = edits.configuration {
                fields.configuration_content = configuration;
            }
            if let Some(initialization_options) = edits.initialization_options {
                fields.initialization_options_content = initialization_options;
            }
        }
    }
    Ok(())
}

fn commit(session: &mut EditingSession<'_>) -> anyhow::Result<()> {
    if !session.is_modified() {
        println!("{}: no changes", session.definition_id());
        return Ok(());
    }
    session.apply()?;
    println!("{}: settings applied", session.definition_id());
    Ok(())
}
