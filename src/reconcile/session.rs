//! Editing session over one definition

use tracing::debug;

use crate::reconcile::engine::ReconciliationEngine;
use crate::reconcile::error::ConfigurationError;
use crate::reconcile::view::ReconciliationView;
use crate::settings::types::DefinitionKind;

/// State of an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The view reflects what was last loaded or applied
    Loaded,
    /// The view has been edited since the last reset or apply
    Dirty,
}

/// One open editing context for a definition
///
/// Dropping the session discards any unapplied edits.
pub struct EditingSession<'a> {
    engine: &'a ReconciliationEngine,
    definition_id: String,
    kind: DefinitionKind,
    view: ReconciliationView,
    state: SessionState,
}

impl<'a> EditingSession<'a> {
    /// Open a session with a freshly reset view
    pub fn open(engine: &'a ReconciliationEngine, definition_id: &str, kind: DefinitionKind) -> Self {
        let view = engine.reset(definition_id, kind);
        Self {
            engine,
            definition_id: definition_id.to_string(),
            kind,
            view,
            state: SessionState::Loaded,
        }
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn view(&self) -> &ReconciliationView {
        &self.view
    }

    /// Mutate the view; the session becomes dirty
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut ReconciliationView) -> T) -> T {
        self.state = SessionState::Dirty;
        f(&mut self.view)
    }

    pub fn is_modified(&self) -> bool {
        self.engine
            .is_modified(&self.definition_id, self.kind, &self.view)
    }

    /// Commit the view. On failure the session stays dirty and the view is kept.
    pub fn apply(&mut self) -> Result<(), ConfigurationError> {
        self.engine
            .apply(&self.definition_id, self.kind, &self.view)?;
        self.state = SessionState::Loaded;
        debug!("Session for {} applied", self.definition_id);
        Ok(())
    }

    /// Discard edits and reload the view from the store
    pub fn reset(&mut self) {
        self.view = self.engine.reset(&self.definition_id, self.kind);
        self.state = SessionState::Loaded;
    }

    pub fn into_view(self) -> ReconciliationView {
        self.view
    }
}
