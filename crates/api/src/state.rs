use std::sync::Arc;

use pixhost_core::assets::AssetStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Filesystem-backed asset registry and mutators.
    pub store: Arc<AssetStore>,
}

impl AppState {
    /// Build state from configuration, constructing the asset store from the
    /// configured directories.
    pub fn new(config: ServerConfig) -> Self {
        let store = AssetStore::new(config.store_config());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
