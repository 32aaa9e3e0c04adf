//! Catalog records.
//!
//! [`Category`] and [`Product`] are rows as the storefront reads them.
//! `New*` types are insert payloads, used by the seed command; they reference
//! categories by slug because IDs are not known until insert time.

mod fixtures;
mod listing;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::NewCartItem;
use crate::types::{CategoryId, Email, ProductId, Slug, UserRole};

pub use fixtures::{CatalogFixtures, FixtureError};
pub use listing::{ListingQuery, SortKey};

/// Products with fewer units than this are flagged on the admin dashboard.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Largest price a `NUMERIC(10,2)` column holds: 99,999,999.99.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Whether `price` could be a catalog price: non-negative and within
/// [`MAX_PRICE`].
#[must_use]
pub fn is_valid_price(price: Decimal) -> bool {
    price >= Decimal::ZERO && price <= MAX_PRICE
}

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub slug: Slug,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub images: Vec<String>,
    pub slug: Slug,
    pub sku: String,
    pub stock: i32,
    pub is_featured: bool,
    pub materials: String,
    pub dimensions: String,
    pub weight: Option<Decimal>,
    pub category_id: CategoryId,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// First image, or the placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Whole-percent saving against the compare-at price, if it is higher.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        use rust_decimal::prelude::ToPrimitive;

        let compare = self.compare_price?;
        if compare <= self.price || compare.is_zero() {
            return None;
        }
        ((compare - self.price) / compare * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }

    /// Stock value at list price.
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock.max(0))
    }

    /// Cart/favorite payload for this product. The cart keys on the product ID.
    #[must_use]
    pub fn to_cart_item(&self) -> NewCartItem {
        NewCartItem {
            id: self.id.to_string(),
            name: self.name.clone(),
            price: self.price,
            image: self.primary_image().to_owned(),
            slug: self.slug.to_string(),
        }
    }
}

/// Insert payload for a category. Unique key: `slug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub slug: Slug,
    pub image: String,
}

/// Insert payload for a product. Unique keys: `slug`, `sku`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub compare_price: Option<Decimal>,
    pub images: Vec<String>,
    pub slug: Slug,
    pub sku: String,
    pub stock: i32,
    pub is_featured: bool,
    pub materials: String,
    pub dimensions: String,
    pub weight: Option<Decimal>,
    pub category_slug: Slug,
    pub meta_title: String,
    pub meta_description: String,
}

/// Insert payload for an account. Unique key: `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: Email,
    pub name: Option<String>,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}
