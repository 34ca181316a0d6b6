use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::database::DatabaseManager;
use crate::store::{CatalogFixtures, MemoryCatalog, MemoryPinStore, PgCatalog, PgPinStore, PinStore, ResourceCatalog};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pins: Arc<dyn PinStore>,
    pub catalog: Arc<dyn ResourceCatalog>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(pins: Arc<dyn PinStore>, catalog: Arc<dyn ResourceCatalog>, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            pins,
            catalog,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Build the storage backend selected by configuration
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if config.security.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must be set in {:?} mode", config.environment);
        }

        match config.storage.backend {
            StorageBackend::Memory => {
                let catalog = match &config.storage.fixtures {
                    Some(path) => MemoryCatalog::from_fixtures(CatalogFixtures::load(path)?),
                    None => MemoryCatalog::new(),
                };
                info!("Using in-memory pinned resource store");
                Ok(Self::new(
                    Arc::new(MemoryPinStore::new()),
                    Arc::new(catalog),
                    config.security.jwt_secret.as_str(),
                ))
            }
            StorageBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                let pins = PgPinStore::new(pool.clone());
                pins.migrate().await?;
                info!("Using PostgreSQL pinned resource store");
                Ok(Self::new(
                    Arc::new(pins),
                    Arc::new(PgCatalog::new(pool)),
                    config.security.jwt_secret.as_str(),
                ))
            }
        }
    }
}
