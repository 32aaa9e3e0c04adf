//! Cart and favorites entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product reference as submitted by an "add to cart" or "favorite" button.
///
/// Carries the display fields so the cart renders without a catalog lookup.
/// The `id` is not validated; an empty string is a valid (if useless) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub slug: String,
}

/// A line in the cart. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub slug: String,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            slug: item.slug,
            quantity: 1,
        }
    }
}

/// A bookmarked product. No quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub slug: String,
}

impl From<NewCartItem> for Favorite {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            slug: item.slug,
        }
    }
}

impl From<&Favorite> for NewCartItem {
    fn from(favorite: &Favorite) -> Self {
        Self {
            id: favorite.id.clone(),
            name: favorite.name.clone(),
            price: favorite.price,
            image: favorite.image.clone(),
            slug: favorite.slug.clone(),
        }
    }
}
