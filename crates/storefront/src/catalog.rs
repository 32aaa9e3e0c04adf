//! Cached catalog snapshot.
//!
//! Listing pages filter and sort in memory over a snapshot of all categories
//! and products. The snapshot is cached with `moka` for one minute, so catalog
//! changes made by the seed command show up without a restart.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use magray_arts_core::CategoryId;
use magray_arts_core::catalog::{Category, Product};

use crate::db::{CategoryRepository, ProductRepository, RepositoryError};

const SNAPSHOT_TTL: Duration = Duration::from_secs(60);

/// All categories and products at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Alphabetical.
    pub categories: Vec<Category>,
    /// Newest first.
    pub products: Vec<Product>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug.as_str() == slug)
    }

    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Featured products, newest first.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_featured)
            .take(limit)
            .collect()
    }

    /// Number of products filed under a category.
    #[must_use]
    pub fn product_count(&self, id: CategoryId) -> usize {
        self.products.iter().filter(|p| p.category_id == id).count()
    }

    /// Other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category_id == product.category_id && p.id != product.id)
            .take(limit)
            .collect()
    }
}

/// Shared, lazily loaded [`CatalogSnapshot`].
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<(), Arc<CatalogSnapshot>>,
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(SNAPSHOT_TTL)
            .build();
        Self { cache }
    }

    /// Current snapshot, loading it from the database on a miss.
    ///
    /// Concurrent misses share one load.
    ///
    /// # Errors
    ///
    /// Returns the repository error if loading fails. Failed loads are not cached.
    #[instrument(skip_all)]
    pub async fn snapshot(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<CatalogSnapshot>, Arc<RepositoryError>> {
        self.cache
            .try_get_with((), async {
                debug!("Loading catalog snapshot");
                let categories = CategoryRepository::new(pool).list_all().await?;
                let products = ProductRepository::new(pool).list_all().await?;
                Ok::<_, RepositoryError>(Arc::new(CatalogSnapshot {
                    categories,
                    products,
                }))
            })
            .await
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}
