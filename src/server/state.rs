//! Application state shared across handlers

use std::sync::Arc;

use crate::inference::ModelAdapter;
use crate::storage::LogStore;

use super::ServerConfig;

/// Shared per-process state: the one loaded model and the log store.
/// The adapter is constructed before any request is served and never
/// replaced; concurrent handlers read it without synchronization.
pub struct AppState {
    pub config: ServerConfig,
    pub adapter: Arc<ModelAdapter>,
    pub store: LogStore,
}

impl AppState {
    pub fn new(config: ServerConfig, adapter: ModelAdapter, store: LogStore) -> Self {
        Self {
            config,
            adapter: Arc::new(adapter),
            store,
        }
    }
}
