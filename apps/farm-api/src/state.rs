use std::sync::Arc;

use farm_core::RankThresholds;
use farm_db::Database;

use crate::auth::JwtManager;
use crate::config::{AppConfig, ConfigError};

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (pool + repositories).
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtManager>,
    /// Validated once at startup.
    pub thresholds: RankThresholds,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Result<Self, ConfigError> {
        let thresholds = config.rank_thresholds()?;
        let jwt = JwtManager::new(&config.auth.jwt_secret, config.auth.token_lifetime_secs);

        Ok(AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            thresholds,
        })
    }
}
