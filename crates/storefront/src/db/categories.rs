//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use magray_arts_core::catalog::{Category, NewCategory};
use magray_arts_core::{CategoryId, Slug};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
    slug: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category slug in database: {e}"))
        })?;

        Ok(Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            slug,
            image: row.image,
            created_at: row.created_at,
        })
    }
}

/// Category with the number of products filed under it.
#[derive(Debug, Clone)]
pub struct CategoryWithCount {
    pub category: Category,
    pub product_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    product_count: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored slug is invalid.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, slug, image, created_at
            FROM storefront.category
            ORDER BY name, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// All categories with their product counts, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored slug is invalid.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.id, c.name, c.description, c.slug, c.image, c.created_at,
                   COUNT(p.id) AS product_count
            FROM storefront.category c
            LEFT JOIN storefront.product p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name, c.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryWithCount {
                    category: row.category.try_into()?,
                    product_count: row.product_count,
                })
            })
            .collect()
    }

    /// Look up a category by slug. Slugs are unique, so at most one matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored slug is invalid.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, slug, image, created_at
            FROM storefront.category
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a category unless one with the same slug exists.
    ///
    /// Returns `true` if a row was created. The unique index on `slug` makes
    /// this safe against concurrent inserts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_absent(&self, category: &NewCategory) -> Result<bool, RepositoryError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            r"
            INSERT INTO storefront.category (name, description, slug, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            ",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.slug.as_str())
        .bind(&category.image)
        .fetch_optional(self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    /// Resolve a slug to its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this slug.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn id_for_slug(&self, slug: &Slug) -> Result<CategoryId, RepositoryError> {
        let id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM storefront.category WHERE slug = $1")
                .bind(slug.as_str())
                .fetch_optional(self.pool)
                .await?;

        id.map(CategoryId::new).ok_or(RepositoryError::NotFound)
    }
}
