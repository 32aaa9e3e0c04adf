//! Aggregate queries for the admin dashboard.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;

/// Store-wide counts and inventory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct DashboardStats {
    pub product_count: i64,
    pub category_count: i64,
    /// Accounts with the `USER` role.
    pub customer_count: i64,
    pub featured_count: i64,
    /// Sum of price x stock over all products.
    pub inventory_value: Decimal,
}

/// Repository for dashboard aggregates.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute dashboard stats in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard(&self) -> Result<DashboardStats, RepositoryError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM storefront.product) AS product_count,
                (SELECT COUNT(*) FROM storefront.category) AS category_count,
                (SELECT COUNT(*) FROM storefront."user" WHERE role = 'USER') AS customer_count,
                (SELECT COUNT(*) FROM storefront.product WHERE is_featured) AS featured_count,
                (SELECT COALESCE(SUM(price * GREATEST(stock, 0)), 0)::numeric
                   FROM storefront.product) AS inventory_value
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }
}
