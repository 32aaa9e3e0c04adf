//! Template view models.
//!
//! Handlers turn domain values into these plain structs so templates only
//! deal with preformatted strings and flags.

use chrono::Datelike;
use rust_decimal::Decimal;

use magray_arts_core::catalog::Product;
use magray_arts_core::pricing::{OrderSummary, truncate_text};
use magray_arts_core::store::{CartItem, Favorite, Store};
use magray_arts_core::{CurrencyCode, format_price};

use crate::catalog::CatalogSnapshot;
use crate::config::CommerceConfig;
use crate::models::CurrentUser;

const CARD_DESCRIPTION_CHARS: usize = 90;

/// Data every full page needs for the header, drawer and footer.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub title: String,
    pub currency: String,
    pub currencies: Vec<CurrencyOption>,
    pub cart_count: u64,
    pub favorites_count: usize,
    pub signed_in: bool,
    pub user_name: String,
    pub is_admin: bool,
    pub cart_open: bool,
    pub menu_open: bool,
    pub drawer: CartView,
    /// Path of the current page, used for the drawer and menu toggle links.
    pub current_path: String,
    pub year: i32,
}

impl LayoutContext {
    #[must_use]
    pub fn new(title: &str, store: &Store, user: Option<&CurrentUser>, path: &str) -> Self {
        let currency = store.currency().to_owned();
        Self {
            title: title.to_owned(),
            currencies: CurrencyOption::all(&currency),
            cart_count: store.cart_items_count(),
            favorites_count: store.favorites().len(),
            signed_in: user.is_some(),
            user_name: user.map(|u| u.display_name().to_owned()).unwrap_or_default(),
            is_admin: user.is_some_and(CurrentUser::is_admin),
            cart_open: store.is_cart_open(),
            menu_open: store.is_mobile_menu_open(),
            drawer: CartView::new(store),
            current_path: path.to_owned(),
            year: chrono::Utc::now().year(),
            currency,
        }
    }
}

/// An entry in the currency selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub selected: bool,
}

impl CurrencyOption {
    fn all(current: &str) -> Vec<Self> {
        CurrencyCode::ALL
            .iter()
            .map(|c| Self {
                code: c.code(),
                selected: c.code().eq_ignore_ascii_case(current),
            })
            .collect()
    }
}

/// A product tile in listings.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub summary: String,
    pub image: String,
    pub price_raw: String,
    pub price: String,
    pub has_compare_price: bool,
    pub compare_price: String,
    pub discount: String,
    pub category_name: String,
    pub in_stock: bool,
    pub is_favorite: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, catalog: &CatalogSnapshot, store: &Store) -> Self {
        let currency = store.currency();
        let id = product.id.to_string();
        let compare = product
            .compare_price
            .filter(|_| product.discount_percent().is_some());

        Self {
            is_favorite: store.is_favorite(&id),
            name: product.name.clone(),
            slug: product.slug.to_string(),
            summary: truncate_text(&product.description, CARD_DESCRIPTION_CHARS),
            image: product.primary_image().to_owned(),
            price_raw: product.price.to_string(),
            price: format_price(product.price, currency),
            has_compare_price: compare.is_some(),
            compare_price: compare
                .map(|c| format_price(c, currency))
                .unwrap_or_default(),
            discount: product
                .discount_percent()
                .map(|d| format!("-{d}%"))
                .unwrap_or_default(),
            category_name: catalog
                .category_name(product.category_id)
                .unwrap_or_default()
                .to_owned(),
            in_stock: product.in_stock(),
            id,
        }
    }

    /// Cards for a list of products.
    #[must_use]
    pub fn list(products: &[&Product], catalog: &CatalogSnapshot, store: &Store) -> Vec<Self> {
        products
            .iter()
            .map(|p| Self::new(p, catalog, store))
            .collect()
    }
}

/// A category tile.
#[derive(Debug, Clone)]
pub struct CategoryCard {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub product_count: usize,
}

impl CategoryCard {
    #[must_use]
    pub fn list(catalog: &CatalogSnapshot) -> Vec<Self> {
        catalog
            .categories
            .iter()
            .map(|c| Self {
                name: c.name.clone(),
                slug: c.slug.to_string(),
                description: c.description.clone(),
                image: c.image.clone(),
                product_count: catalog.product_count(c.id),
            })
            .collect()
    }
}

/// Heart toggle returned after a favorite is flipped.
#[derive(Debug, Clone)]
pub struct FavoriteButton {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price_raw: String,
    pub is_favorite: bool,
}

/// A cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub quantity: u32,
    pub decrement: i64,
    pub increment: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl CartLineView {
    fn new(item: &CartItem, currency: &str) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            slug: item.slug.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            decrement: quantity - 1,
            increment: quantity + 1,
            unit_price: format_price(item.price, currency),
            line_total: format_price(item.line_total(), currency),
        }
    }
}

/// The cart as shown in the drawer and on the cart page.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub count: u64,
    pub subtotal: String,
    pub is_empty: bool,
}

impl CartView {
    #[must_use]
    pub fn new(store: &Store) -> Self {
        let currency = store.currency();
        Self {
            items: store
                .cart_items()
                .iter()
                .map(|i| CartLineView::new(i, currency))
                .collect(),
            count: store.cart_items_count(),
            subtotal: format_price(store.cart_total(), currency),
            is_empty: store.cart_items().is_empty(),
        }
    }
}

/// Order totals on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
    pub tax_label: String,
}

impl SummaryView {
    /// Totals for the cart, weighing items against the catalog.
    ///
    /// Items no longer in the catalog count as weightless.
    #[must_use]
    pub fn new(store: &Store, catalog: &CatalogSnapshot, commerce: &CommerceConfig) -> Self {
        let weight = cart_weight(store, catalog);
        let summary = OrderSummary::new(
            store.cart_total(),
            commerce.tax_rate,
            weight,
            &commerce.shipping_country,
        );
        let currency = store.currency();

        Self {
            subtotal: format_price(summary.subtotal, currency),
            tax: format_price(summary.tax, currency),
            shipping: format_price(summary.shipping, currency),
            total: format_price(summary.total, currency),
            tax_label: format!(
                "Tax ({}%)",
                (commerce.tax_rate * Decimal::ONE_HUNDRED).normalize()
            ),
        }
    }
}

/// Total shipping weight in kilograms.
#[must_use]
pub fn cart_weight(store: &Store, catalog: &CatalogSnapshot) -> Decimal {
    store
        .cart_items()
        .iter()
        .filter_map(|item| {
            let product = catalog
                .products
                .iter()
                .find(|p| p.id.to_string() == item.id)?;
            Some(product.weight.unwrap_or_default() * Decimal::from(item.quantity))
        })
        .sum()
}

/// A favorites page entry.
#[derive(Debug, Clone)]
pub struct FavoriteView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price_raw: String,
    pub price: String,
}

impl FavoriteView {
    #[must_use]
    pub fn new(favorite: &Favorite, currency: &str) -> Self {
        Self {
            id: favorite.id.clone(),
            name: favorite.name.clone(),
            slug: favorite.slug.clone(),
            image: favorite.image.clone(),
            price_raw: favorite.price.to_string(),
            price: format_price(favorite.price, currency),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use magray_arts_core::catalog::Category;
    use magray_arts_core::store::NewCartItem;
    use magray_arts_core::{CategoryId, ProductId, Slug, UserId, UserRole};

    use super::*;

    fn carpet() -> Product {
        Product {
            id: ProductId::new(2),
            name: "Kashmir Silk Carpet - 4x6 ft".to_string(),
            description: "Hand-knotted pure silk carpet".to_string(),
            price: Decimal::new(129_999, 2),
            compare_price: Some(Decimal::new(159_999, 2)),
            images: vec!["/images/products/carpet1-1.jpg".to_string()],
            slug: Slug::parse("kashmir-silk-carpet-4x6").unwrap(),
            sku: "KSC-4X6-001".to_string(),
            stock: 3,
            is_featured: true,
            materials: "100% Pure Silk".to_string(),
            dimensions: "4 x 6 feet".to_string(),
            weight: Some(Decimal::new(55, 1)),
            category_id: CategoryId::new(2),
            meta_title: String::new(),
            meta_description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot {
            categories: vec![Category {
                id: CategoryId::new(2),
                name: "Carpets & Rugs".to_string(),
                description: String::new(),
                slug: Slug::parse("carpets-rugs").unwrap(),
                image: String::new(),
                created_at: Utc::now(),
            }],
            products: vec![carpet()],
        }
    }

    #[test]
    fn test_product_card() {
        let mut store = Store::default();
        store.add_to_favorites(carpet().to_cart_item().into());

        let card = ProductCard::new(&carpet(), &catalog(), &store);
        assert_eq!(card.id, "2");
        assert_eq!(card.price, "$1,299.99");
        assert!(card.has_compare_price);
        assert_eq!(card.compare_price, "$1,599.99");
        assert_eq!(card.discount, "-19%");
        assert_eq!(card.category_name, "Carpets & Rugs");
        assert!(card.is_favorite);
        assert!(card.in_stock);
    }

    #[test]
    fn test_summary_uses_catalog_weight() {
        let mut store = Store::default();
        store.add_to_cart(carpet().to_cart_item());
        store.add_to_cart(NewCartItem {
            id: "999".to_string(),
            name: "Discontinued".to_string(),
            price: Decimal::new(1000, 2),
            image: String::new(),
            slug: "discontinued".to_string(),
        });

        assert_eq!(cart_weight(&store, &catalog()), Decimal::new(55, 1));

        let summary = SummaryView::new(&store, &catalog(), &CommerceConfig::default());
        assert_eq!(summary.subtotal, "$1,309.99");
        assert_eq!(summary.tax, "$131.00");
        // 10 + 5.5 * 0.5
        assert_eq!(summary.shipping, "$12.75");
        assert_eq!(summary.total, "$1,453.74");
        assert_eq!(summary.tax_label, "Tax (10%)");
    }

    #[test]
    fn test_layout_context() {
        let mut store = Store::default();
        store.add_to_cart(carpet().to_cart_item());
        store.add_to_cart(carpet().to_cart_item());
        store.set_currency("EUR");
        store.set_cart_open(true);

        let admin = CurrentUser {
            id: UserId::new(1),
            email: magray_arts_core::Email::parse("admin@magrayarts.com").unwrap(),
            name: None,
            image: None,
            role: UserRole::Admin,
        };

        let layout = LayoutContext::new("Cart", &store, Some(&admin), "/cart");
        assert_eq!(layout.cart_count, 2);
        assert!(layout.cart_open);
        assert!(!layout.menu_open);
        assert!(layout.is_admin);
        assert_eq!(layout.user_name, "admin@magrayarts.com");
        assert_eq!(layout.drawer.subtotal, "€2,599.98");
        let selected: Vec<&str> = layout
            .currencies
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.code)
            .collect();
        assert_eq!(selected, vec!["EUR"]);
    }

    #[test]
    fn test_cart_line_steps() {
        let mut store = Store::default();
        store.add_to_cart(carpet().to_cart_item());
        let view = CartView::new(&store);
        let line = view.items.first().unwrap();
        assert_eq!(line.decrement, 0);
        assert_eq!(line.increment, 2);
        assert_eq!(line.line_total, "$1,299.99");
        assert!(!view.is_empty);
    }
}
