//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{StoreBackend, StorefrontConfig};
use crate::db::{self, LessonStore, MemoryStore, OrderStore, PgLessonStore, PgOrderStore};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database url is required for the postgres store")]
    MissingDatabaseUrl,
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the document stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    lessons: Arc<dyn LessonStore>,
    orders: Arc<dyn OrderStore>,
}

impl AppState {
    /// Create a new application state from explicit stores.
    pub fn new(
        config: StorefrontConfig,
        lessons: Arc<dyn LessonStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                lessons,
                orders,
            }),
        }
    }

    /// Create application state backed by a single in-memory store.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(config, store.clone(), store)
    }

    /// Create application state for the configured store backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the Postgres backend is selected and the pool
    /// cannot be created.
    pub async fn connect(config: StorefrontConfig) -> Result<Self, StateError> {
        match config.store {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config, MemoryStore::new()))
            }
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_ref()
                    .ok_or(StateError::MissingDatabaseUrl)?;
                let pool = db::create_pool(url).await?;
                tracing::info!("Database pool created");

                Ok(Self::new(
                    config,
                    Arc::new(PgLessonStore::new(pool.clone())),
                    Arc::new(PgOrderStore::new(pool)),
                ))
            }
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the lesson store.
    #[must_use]
    pub fn lessons(&self) -> &dyn LessonStore {
        self.inner.lessons.as_ref()
    }

    /// Get the order store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }
}
