//! Product repository.
//!
//! Product images are stored as a JSON-encoded list of paths in a text column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use magray_arts_core::catalog::{NewProduct, Product};
use magray_arts_core::{CategoryId, ProductId, Slug};

use super::{RepositoryError, map_unique_violation};

const PRODUCT_COLUMNS: &str = "id, name, description, price, compare_price, images, slug, sku, \
     stock, is_featured, materials, dimensions, weight, category_id, meta_title, \
     meta_description, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    compare_price: Option<Decimal>,
    images: String,
    slug: String,
    sku: String,
    stock: i32,
    is_featured: bool,
    materials: String,
    dimensions: String,
    weight: Option<Decimal>,
    category_id: i32,
    meta_title: String,
    meta_description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product slug in database: {e}"))
        })?;
        let images = decode_images(&row.images)?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            compare_price: row.compare_price,
            images,
            slug,
            sku: row.sku,
            stock: row.stock,
            is_featured: row.is_featured,
            materials: row.materials,
            dimensions: row.dimensions,
            weight: row.weight,
            category_id: CategoryId::new(row.category_id),
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            created_at: row.created_at,
        })
    }
}

fn decode_images(raw: &str) -> Result<Vec<String>, RepositoryError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid product images: {e}")))
}

fn encode_images(images: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(images)
        .map_err(|e| RepositoryError::DataCorruption(format!("unencodable product images: {e}")))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row cannot be decoded.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Look up a product by slug. Slugs are unique, so at most one matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row cannot be decoded.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Products below the given stock level, lowest stock first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row cannot be decoded.
    pub async fn list_low_stock(&self, threshold: i32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE stock < $1 ORDER BY stock, name"
        ))
        .bind(threshold)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Insert a product unless one with the same slug exists.
    ///
    /// Returns `true` if a row was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a different product already uses the SKU.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert_if_absent(
        &self,
        product: &NewProduct,
        category_id: CategoryId,
    ) -> Result<bool, RepositoryError> {
        let images = encode_images(&product.images)?;

        let inserted: Option<i32> = sqlx::query_scalar(
            r"
            INSERT INTO storefront.product (
                name, description, price, compare_price, images, slug, sku, stock,
                is_featured, materials, dimensions, weight, category_id,
                meta_title, meta_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.compare_price)
        .bind(images)
        .bind(product.slug.as_str())
        .bind(&product.sku)
        .bind(product.stock)
        .bind(product.is_featured)
        .bind(&product.materials)
        .bind(&product.dimensions)
        .bind(product.weight)
        .bind(category_id)
        .bind(&product.meta_title)
        .bind(&product.meta_description)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product sku"))?;

        Ok(inserted.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_images() {
        assert_eq!(
            decode_images(r#"["/images/products/carpet1-1.jpg","/images/products/carpet1-2.jpg"]"#)
                .unwrap(),
            vec![
                "/images/products/carpet1-1.jpg".to_string(),
                "/images/products/carpet1-2.jpg".to_string()
            ]
        );
        assert!(decode_images("").unwrap().is_empty());
        assert!(matches!(
            decode_images("/images/a.jpg"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_encode_images() {
        let images = vec!["/images/products/box1-1.jpg".to_string()];
        let encoded = encode_images(&images).unwrap();
        assert_eq!(encoded, r#"["/images/products/box1-1.jpg"]"#);
        assert!(encode_images(&[]).unwrap() == "[]");
    }
}
