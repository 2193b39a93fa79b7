use std::sync::Arc;

use crate::scouting::analyze::Scouting;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only vocabulary, optional model scorer and inference settings.
    pub scouting: Scouting,
    /// Pluggable profile persistence. Default: JsonFileStore.
    pub store: Arc<dyn ProfileStore>,
}
