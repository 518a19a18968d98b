//! Database service layer
//!
//! Picks the configured storage backend and hands out the stores behind their
//! traits.

use std::sync::Arc;
use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::{create_pool, run_migrations, DatabasePool, GroupRepository, GroupStore, MemoryStore, ProfileStore, UserRepository};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub groups: Arc<dyn GroupStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            groups: Arc::new(GroupRepository::new(pool.clone())),
            profiles: Arc::new(UserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            groups: Arc::new(store.clone()),
            profiles: Arc::new(store),
            pool: None,
        }
    }

    /// Connect to the configured backend, running migrations when asked to
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let pool = create_pool(config).await?;
                if config.run_migrations {
                    run_migrations(&pool).await?;
                }
                Ok(Self::new(pool))
            }
        }
    }

    /// The Postgres pool, if this service is backed by one
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}
