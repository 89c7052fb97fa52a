use std::sync::Arc;

use erp_core::policy::PolicyRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and everything else sits
/// behind `Arc`. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: erp_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Entity kind to policy mapping, built once at startup.
    pub policies: Arc<PolicyRegistry>,
}
