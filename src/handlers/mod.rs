pub mod connections;
pub mod ops;
pub mod resources;

use crate::config::AppConfig;
use crate::db::ConnectionProvider;

/// Shared, immutable per-process state. The provider holds configuration
/// only; live connections are always scoped to a single request.
#[derive(Clone)]
pub struct AppState {
    pub provider: ConnectionProvider,
    pub read_limit: i64,
    pub cors_origin: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            provider: ConnectionProvider::new(&config.database),
            read_limit: config.api.read_limit,
            cors_origin: config.api.cors_origin.clone(),
        }
    }
}
