//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::{CatalogCache, CatalogSnapshot};
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: CatalogCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog: CatalogCache::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the cached catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the catalog cannot be loaded.
    pub async fn catalog(&self) -> Result<Arc<CatalogSnapshot>, AppError> {
        self.inner
            .catalog
            .snapshot(&self.inner.pool)
            .await
            .map_err(|e| AppError::Internal(format!("failed to load catalog: {e}")))
    }
}

/// State backed by a lazy pool that never connects, for handler tests that
/// must not reach the database.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    #[allow(clippy::unwrap_used)]
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/magray_arts_test")
        .unwrap();
    AppState::new(crate::config::test_config(), pool)
}
