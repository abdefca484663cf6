//! Store and engine test utilities

use std::sync::Arc;

use tempfile::TempDir;

use lsp_settings::mapping::MappingRule;
use lsp_settings::reconcile::ReconciliationEngine;
use lsp_settings::registry::{LanguageServerDefinition, LanguageServersRegistry};
use lsp_settings::settings::SqliteSettingsStore;

/// An engine wired to a SQLite store in a temporary directory
pub struct TestEnv {
    // Held so the database outlives the test
    pub temp_dir: TempDir,
    pub store: Arc<SqliteSettingsStore>,
    pub registry: Arc<LanguageServersRegistry>,
    pub engine: ReconciliationEngine,
}

impl TestEnv {
    /// Open a second engine over the same database, as a new process would
    pub fn reopen(&self) -> ReconciliationEngine {
        let store =
            Arc::new(SqliteSettingsStore::new(&self.temp_dir.path().join("settings.db")).unwrap());
        let registry = Arc::new(LanguageServersRegistry::new());
        registry.load_user_defined(&store).unwrap();
        ReconciliationEngine::new(store.clone(), store, registry)
    }
}

/// Create a test environment with `rust-analyzer` registered as a static definition
pub fn create_test_env() -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let store =
        Arc::new(SqliteSettingsStore::new(&temp_dir.path().join("settings.db")).unwrap());
    let registry = Arc::new(LanguageServersRegistry::new());
    registry.register(LanguageServerDefinition::new_static(
        "rust-analyzer",
        "Rust Analyzer",
        vec![
            MappingRule::language("Rust", "rust"),
            MappingRule::file_name_patterns(["*.rs"], "rust"),
        ],
    ));
    let engine = ReconciliationEngine::new(store.clone(), store.clone(), registry.clone());

    TestEnv {
        temp_dir,
        store,
        registry,
        engine,
    }
}
