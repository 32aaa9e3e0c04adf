//! Cart and favorites store.
//!
//! [`Store`] owns the shopper's cart, favorites, display currency and two UI
//! toggles. It is a plain value: the storefront loads one per request from the
//! session, applies an operation and writes [`Store::persisted`] back.
//!
//! # Invariants
//!
//! - At most one [`CartItem`] per id, quantity always >= 1.
//! - At most one [`Favorite`] per id.
//! - Cart and favorites keep insertion order.
//!
//! Every operation is total. Unknown ids are no-ops, not errors.
//!
//! # Example
//!
//! ```
//! use magray_arts_core::store::{NewCartItem, Store};
//! use rust_decimal::Decimal;
//!
//! let mut store = Store::default();
//! let shawl = NewCartItem {
//!     id: "1".into(),
//!     name: "Royal Pashmina Shawl - Burgundy".into(),
//!     price: Decimal::new(29999, 2),
//!     image: "/images/products/pashmina1-1.jpg".into(),
//!     slug: "royal-pashmina-shawl-burgundy".into(),
//! };
//! store.add_to_cart(shawl.clone());
//! store.add_to_cart(shawl);
//! assert_eq!(store.cart_items_count(), 2);
//! assert_eq!(store.cart_total(), Decimal::new(59998, 2));
//! ```

mod items;
mod persist;

use rust_decimal::Decimal;

pub use items::{CartItem, Favorite, NewCartItem};
pub use persist::{DEFAULT_CURRENCY, PersistedState, STORAGE_KEY};

/// The shopper's cart, favorites and UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    cart_items: Vec<CartItem>,
    favorites: Vec<Favorite>,
    currency: String,
    cart_open: bool,
    mobile_menu_open: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self::from_persisted(PersistedState::default())
    }
}

impl Store {
    /// Rebuild a store from its persisted subset. UI toggles start closed.
    ///
    /// A hand-edited or stale blob is normalized rather than rejected:
    /// duplicate cart ids are merged (quantities summed), zero-quantity lines
    /// are dropped and duplicate favorites keep their first occurrence.
    #[must_use]
    pub fn from_persisted(state: PersistedState) -> Self {
        let mut store = Self {
            cart_items: Vec::with_capacity(state.cart_items.len()),
            favorites: Vec::with_capacity(state.favorites.len()),
            currency: state.currency,
            cart_open: false,
            mobile_menu_open: false,
        };

        for item in state.cart_items {
            if item.quantity == 0 {
                continue;
            }
            match store.cart_items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => store.cart_items.push(item),
            }
        }

        for favorite in state.favorites {
            store.push_favorite(favorite);
        }

        store
    }

    /// Snapshot of the durable subset.
    #[must_use]
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            cart_items: self.cart_items.clone(),
            favorites: self.favorites.clone(),
            currency: self.currency.clone(),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[must_use]
    pub fn cart_items(&self) -> &[CartItem] {
        &self.cart_items
    }

    /// Add one unit. Existing lines are incremented, new ids are appended with
    /// quantity 1. There is no stock cap.
    pub fn add_to_cart(&mut self, item: NewCartItem) {
        match self.cart_items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.cart_items.push(CartItem::from(item)),
        }
    }

    pub fn remove_from_cart(&mut self, id: &str) {
        self.cart_items.retain(|i| i.id != id);
    }

    /// Overwrite a line's quantity. Zero or negative removes the line.
    pub fn update_cart_item_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.cart_items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart_items.clear();
    }

    /// Sum of price x quantity over all lines. Saturates instead of
    /// overflowing, so a cart holding absurd prices still renders.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart_items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of quantities (a line with quantity 3 counts as 3).
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.cart_items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    #[must_use]
    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// Insert unless a favorite with the same id already exists.
    pub fn add_to_favorites(&mut self, item: Favorite) {
        self.push_favorite(item);
    }

    pub fn remove_from_favorites(&mut self, id: &str) {
        self.favorites.retain(|f| f.id != id);
    }

    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }

    /// Remove the favorite if present, add it otherwise. Returns whether the
    /// item is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item: Favorite) -> bool {
        if self.is_favorite(&item.id) {
            self.remove_from_favorites(&item.id);
            false
        } else {
            self.favorites.push(item);
            true
        }
    }

    fn push_favorite(&mut self, item: Favorite) {
        if !self.is_favorite(&item.id) {
            self.favorites.push(item);
        }
    }

    // =========================================================================
    // Currency and UI toggles
    // =========================================================================

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Stored verbatim; display code falls back gracefully for unknown codes.
    pub fn set_currency(&mut self, currency: impl Into<String>) {
        self.currency = currency.into();
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    pub const fn set_cart_open(&mut self, open: bool) {
        self.cart_open = open;
    }

    #[must_use]
    pub const fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub const fn set_mobile_menu_open(&mut self, open: bool) {
        self.mobile_menu_open = open;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64) -> NewCartItem {
        NewCartItem {
            id: id.to_owned(),
            name: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            image: format!("/images/products/{id}.jpg"),
            slug: format!("product-{id}"),
        }
    }

    fn favorite(id: &str) -> Favorite {
        Favorite::from(item(id, 1000))
    }

    #[test]
    fn test_repeated_add_counts_calls() {
        let mut store = Store::default();
        for _ in 0..25 {
            store.add_to_cart(item("a", 100));
        }
        assert_eq!(store.cart_items().len(), 1);
        assert_eq!(store.cart_items()[0].quantity, 25);
    }

    #[test]
    fn test_add_then_remove_leaves_empty_cart() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 100));
        store.remove_from_cart("a");
        assert!(store.cart_items().is_empty());
        assert_eq!(store.cart_total(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 100));
        store.remove_from_cart("missing");
        store.update_cart_item_quantity("missing", 4);
        assert_eq!(store.cart_items_count(), 1);
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let mut updated = Store::default();
        updated.add_to_cart(item("a", 100));
        updated.add_to_cart(item("b", 200));
        let mut removed = updated.clone();

        updated.update_cart_item_quantity("a", 0);
        removed.remove_from_cart("a");
        assert_eq!(updated, removed);

        updated.update_cart_item_quantity("b", -3);
        assert!(updated.cart_items().is_empty());
    }

    #[test]
    fn test_update_overwrites_quantity() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 1000));
        store.update_cart_item_quantity("a", 3);
        assert_eq!(store.cart_items()[0].quantity, 3);
        assert_eq!(store.cart_total(), Decimal::new(3000, 2));
    }

    #[test]
    fn test_count_sums_quantities_not_lines() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 100));
        store.update_cart_item_quantity("a", 3);
        store.add_to_cart(item("b", 100));
        assert_eq!(store.cart_items().len(), 2);
        assert_eq!(store.cart_items_count(), 4);
    }

    #[test]
    fn test_checkout_scenario_totals() {
        let mut store = Store::default();
        store.add_to_cart(item("shawl", 29999));
        store.add_to_cart(item("shawl", 29999));
        store.add_to_cart(item("box", 7999));

        assert_eq!(store.cart_items_count(), 3);
        assert_eq!(store.cart_total(), Decimal::new(67997, 2));
        assert_eq!(store.cart_total().to_string(), "679.97");
    }

    #[test]
    fn test_cart_keeps_insertion_order() {
        let mut store = Store::default();
        store.add_to_cart(item("c", 1));
        store.add_to_cart(item("a", 1));
        store.add_to_cart(item("c", 1));
        let ids: Vec<_> = store.cart_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
    }

    #[test]
    fn test_clear_cart_keeps_favorites() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 100));
        store.add_to_favorites(favorite("a"));
        store.clear_cart();
        assert!(store.cart_items().is_empty());
        assert!(store.is_favorite("a"));
    }

    #[test]
    fn test_empty_id_is_accepted() {
        let mut store = Store::default();
        store.add_to_cart(item("", 500));
        assert_eq!(store.cart_items_count(), 1);
    }

    #[test]
    fn test_add_to_favorites_is_idempotent() {
        let mut store = Store::default();
        store.add_to_favorites(favorite("a"));
        store.add_to_favorites(favorite("a"));
        assert_eq!(store.favorites().len(), 1);
    }

    #[test]
    fn test_is_favorite_tracks_add_and_remove() {
        let mut store = Store::default();
        assert!(!store.is_favorite("a"));
        store.add_to_favorites(favorite("a"));
        assert!(store.is_favorite("a"));
        store.remove_from_favorites("a");
        assert!(!store.is_favorite("a"));
        store.remove_from_favorites("a");
    }

    #[test]
    fn test_toggle_favorite() {
        let mut store = Store::default();
        assert!(store.toggle_favorite(favorite("a")));
        assert!(store.is_favorite("a"));
        assert!(!store.toggle_favorite(favorite("a")));
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_setters() {
        let mut store = Store::default();
        assert_eq!(store.currency(), "USD");
        store.set_currency("EUR");
        store.set_cart_open(true);
        store.set_mobile_menu_open(true);
        assert_eq!(store.currency(), "EUR");
        assert!(store.is_cart_open());
        assert!(store.is_mobile_menu_open());
    }

    #[test]
    fn test_persisted_roundtrip_resets_ui_toggles() {
        let mut store = Store::default();
        store.add_to_cart(item("a", 29999));
        store.add_to_cart(item("a", 29999));
        store.add_to_favorites(favorite("b"));
        store.set_currency("INR");
        store.set_cart_open(true);
        store.set_mobile_menu_open(true);

        let json = store.persisted().to_json().unwrap();
        assert!(json.contains("\"cartItems\""));
        assert!(!json.contains("cart_open"));

        let restored = Store::from_persisted(PersistedState::from_json(&json).unwrap());
        assert_eq!(restored.cart_items(), store.cart_items());
        assert_eq!(restored.favorites(), store.favorites());
        assert_eq!(restored.currency(), "INR");
        assert!(!restored.is_cart_open());
        assert!(!restored.is_mobile_menu_open());
    }

    #[test]
    fn test_persisted_layout_matches_storage_format() {
        let json = r#"{
            "cartItems": [
                {"id": "1", "name": "Shawl", "price": "299.99", "image": "/a.jpg",
                 "slug": "shawl", "quantity": 2}
            ],
            "favorites": [],
            "currency": "USD"
        }"#;
        let store = Store::from_persisted(PersistedState::from_json(json).unwrap());
        assert_eq!(store.cart_total(), Decimal::new(59998, 2));
    }

    #[test]
    fn test_missing_fields_default() {
        let state = PersistedState::from_json("{}").unwrap();
        assert_eq!(state, PersistedState::default());
        assert!(PersistedState::from_json("not json").is_err());
    }

    #[test]
    fn test_from_persisted_normalizes_tampered_blob() {
        let line = |quantity| CartItem {
            quantity,
            ..CartItem::from(item("a", 100))
        };
        let state = PersistedState {
            cart_items: vec![line(2), line(0), line(3), CartItem {
                quantity: 0,
                ..CartItem::from(item("b", 100))
            }],
            favorites: vec![favorite("x"), favorite("x")],
            currency: "USD".to_owned(),
        };

        let store = Store::from_persisted(state);
        assert_eq!(store.cart_items().len(), 1);
        assert_eq!(store.cart_items()[0].quantity, 5);
        assert_eq!(store.favorites().len(), 1);
    }

    #[test]
    fn test_totals_saturate_instead_of_panicking() {
        let mut store = Store::default();
        let huge = NewCartItem {
            price: Decimal::MAX,
            ..item("x", 0)
        };
        store.add_to_cart(huge.clone());
        store.add_to_cart(huge);
        assert_eq!(store.cart_total(), Decimal::MAX);

        let mut store = Store::default();
        store.add_to_cart(NewCartItem {
            price: Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0),
            ..item("y", 0)
        });
        store.update_cart_item_quantity("y", 4_000_000_000);
        store.add_to_cart(item("z", 100));
        assert_eq!(store.cart_total(), Decimal::MAX);
        assert_eq!(store.cart_items_count(), 4_000_000_001);
    }
}
