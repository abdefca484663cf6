use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::mapping::types::MappingRule;
use crate::settings::error::StoreError;
use crate::settings::store::SettingsStore;
use crate::settings::types::{ErrorReportingKind, ServerTrace, StaticSettings, UserDefinedSettings};

/// Schema migrations
/// Each version contains a list of SQL statements to execute
/// Version N applies `MIGRATIONS[N - 1]` on top of the tables in `create_schema`
const MIGRATIONS: &[&[&str]] = &[];

/// SQLite-backed store holding both settings variants, one table each
pub struct SqliteSettingsStore {
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Initializing settings database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Settings store initialized successfully");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS static_settings (
                definition_id TEXT PRIMARY KEY NOT NULL,
                debug_port TEXT NOT NULL,
                debug_suspend INTEGER NOT NULL,
                server_trace TEXT NOT NULL,
                report_error_kind TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS user_defined_settings (
                definition_id TEXT PRIMARY KEY NOT NULL,
                display_name TEXT NOT NULL,
                command_line TEXT NOT NULL,
                mappings TEXT NOT NULL,
                configuration_content TEXT NOT NULL,
                initialization_options_content TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Self::apply_migrations(&conn)?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Apply pending migrations based on user_version pragma
    fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
        let current_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (i, statements) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                for sql in *statements {
                    conn.execute(sql, [])?;
                }
                debug!("Applied migration v{}", version);
            }
        }

        let target_version = MIGRATIONS.len() as i32;
        if target_version > current_version {
            conn.pragma_update(None, "user_version", target_version)?;
            debug!("Updated schema version to v{}", target_version);
        }

        Ok(())
    }

    pub fn get_static(&self, definition_id: &str) -> Result<Option<StaticSettings>, StoreError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            r#"
            SELECT debug_port, debug_suspend, server_trace, report_error_kind
            FROM static_settings
            WHERE definition_id = ?1
            "#,
            [definition_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        let (debug_port, debug_suspend, server_trace, report_error_kind) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let server_trace =
            server_trace
                .parse::<ServerTrace>()
                .map_err(|_| StoreError::InvalidRecord {
                    definition_id: definition_id.to_string(),
                    reason: format!("unknown server trace '{}'", server_trace),
                })?;
        let report_error_kind = report_error_kind
            .parse::<ErrorReportingKind>()
            .map_err(|_| StoreError::InvalidRecord {
                definition_id: definition_id.to_string(),
                reason: format!("unknown error reporting kind '{}'", report_error_kind),
            })?;

        Ok(Some(StaticSettings {
            debug_port,
            debug_suspend,
            server_trace,
            report_error_kind,
        }))
    }

    pub fn put_static(
        &self,
        definition_id: &str,
        settings: &StaticSettings,
    ) -> Result<(), StoreError> {
        debug!("Saving static settings for {}", definition_id);

        let now = Self::current_timestamp_ms();
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO static_settings
                (definition_id, debug_port, debug_suspend, server_trace, report_error_kind, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(definition_id) DO UPDATE SET
                debug_port = excluded.debug_port,
                debug_suspend = excluded.debug_suspend,
                server_trace = excluded.server_trace,
                report_error_kind = excluded.report_error_kind,
                updated_at = excluded.updated_at
            "#,
            (
                definition_id,
                &settings.debug_port,
                settings.debug_suspend,
                settings.server_trace.as_str(),
                settings.report_error_kind.as_str(),
                now,
            ),
        )?;

        tx.commit()?;
        Ok(())
    }

    pub fn get_user_defined(
        &self,
        definition_id: &str,
    ) -> Result<Option<UserDefinedSettings>, StoreError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            r#"
            SELECT display_name, command_line, mappings, configuration_content,
                   initialization_options_content
            FROM user_defined_settings
            WHERE definition_id = ?1
            "#,
            [definition_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );

        let (
            display_name,
            command_line,
            mappings,
            configuration_content,
            initialization_options_content,
        ) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mappings: Vec<MappingRule> = serde_json::from_str(&mappings)?;

        Ok(Some(UserDefinedSettings {
            display_name,
            command_line,
            mappings,
            configuration_content,
            initialization_options_content,
        }))
    }

    pub fn put_user_defined(
        &self,
        definition_id: &str,
        settings: &UserDefinedSettings,
    ) -> Result<(), StoreError> {
        debug!(
            "Saving user defined settings for {} ({} mappings)",
            definition_id,
            settings.mappings.len()
        );

        // Serialize before locking
        let mappings = serde_json::to_string(&settings.mappings)?;
        let now = Self::current_timestamp_ms();

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO user_defined_settings
                (definition_id, display_name, command_line, mappings, configuration_content,
                 initialization_options_content, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(definition_id) DO UPDATE SET
                display_name = excluded.display_name,
                command_line = excluded.command_line,
                mappings = excluded.mappings,
                configuration_content = excluded.configuration_content,
                initialization_options_content = excluded.initialization_options_content,
                updated_at = excluded.updated_at
            "#,
            (
                definition_id,
                &settings.display_name,
                &settings.command_line,
                &mappings,
                &settings.configuration_content,
                &settings.initialization_options_content,
                now,
            ),
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Ids of all user-defined definitions with a persisted record
    pub fn user_defined_ids(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT definition_id FROM user_defined_settings ORDER BY definition_id")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(ids)
    }
}

impl SettingsStore<StaticSettings> for SqliteSettingsStore {
    fn get(&self, definition_id: &str) -> Result<Option<StaticSettings>, StoreError> {
        self.get_static(definition_id)
    }

    fn put(&self, definition_id: &str, settings: StaticSettings) -> Result<(), StoreError> {
        self.put_static(definition_id, &settings)
    }
}

impl SettingsStore<UserDefinedSettings> for SqliteSettingsStore {
    fn get(&self, definition_id: &str) -> Result<Option<UserDefinedSettings>, StoreError> {
        self.get_user_defined(definition_id)
    }

    fn put(&self, definition_id: &str, settings: UserDefinedSettings) -> Result<(), StoreError> {
        self.put_user_defined(definition_id, &settings)
    }
}
