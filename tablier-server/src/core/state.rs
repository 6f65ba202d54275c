//! Shared application state
//!
//! One [`ServerState`] is built at startup and cloned into every
//! request. Everything inside is a cheap handle.

use std::path::Path;
use std::sync::Arc;

use shared::{AppError, AppResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::config::Config;
use crate::auth::IdentityService;
use crate::catalog::CatalogService;
use crate::db::DbService;
use crate::notify::NotificationBus;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub identity: Arc<IdentityService>,
    pub catalog: CatalogService,
    pub notifier: NotificationBus,
}

impl ServerState {
    /// Open the on-disk store under the configured work dir and wire up
    /// the services
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_dir = Path::new(&config.work_dir).join("database");
        std::fs::create_dir_all(&db_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create {}: {}",
                db_dir.display(),
                e
            ))
        })?;
        let db_path = db_dir.to_string_lossy().to_string();
        let service = DbService::open(&db_path).await?;
        Ok(Self::assemble(config.clone(), service.db))
    }

    /// In-memory state for tests
    pub async fn initialize_in_memory(config: &Config) -> AppResult<Self> {
        let service = DbService::memory().await?;
        Ok(Self::assemble(config.clone(), service.db))
    }

    fn assemble(config: Config, db: Surreal<Db>) -> Self {
        Self {
            identity: Arc::new(IdentityService::new(config.jwt.clone(), db.clone())),
            catalog: CatalogService::new(db.clone()),
            notifier: NotificationBus::new(db.clone()),
            db,
            config,
        }
    }
}
