//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//!
//! # Catalog
//! GET  /products               - Product listing (?q=&category=&sort=)
//! GET  /products/{slug}        - Product detail
//! GET  /categories/{slug}      - Category page
//!
//! # Cart (HTMX fragments, redirects for plain forms)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Favorites
//! GET  /favorites              - Favorites page
//! POST /favorites/toggle       - Toggle a favorite (returns heart button fragment)
//! POST /favorites/remove       - Remove a favorite
//!
//! # Preferences & session
//! POST /currency               - Change display currency
//! POST /auth/signout           - Clear the signed-in user
//!
//! # Admin (ADMIN role only)
//! GET  /admin                  - Dashboard
//! GET  /admin/products         - Product table
//! GET  /admin/categories       - Category table
//! ```
//!
//! Every page renders the shared layout, which reads the cart store; pages
//! accept `?cart=open` and `?menu=open` to show the cart drawer or mobile menu.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod favorites;
pub mod home;
pub mod preferences;
pub mod products;

use axum::{
    Router,
    http::{HeaderMap, header},
    routing::{get, post},
};
use rust_decimal::Decimal;
use url::Url;

use magray_arts_core::catalog::{MAX_PRICE, is_valid_price};

use crate::error::AppError;
use crate::state::AppState;

/// Header HTMX sets on every request it makes.
const HX_REQUEST: &str = "hx-request";

/// Whether the request came from HTMX and wants a fragment back.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// Reject a submitted price a catalog row could never hold.
fn checked_price(price: Decimal) -> Result<Decimal, AppError> {
    if is_valid_price(price) {
        Ok(price)
    } else {
        Err(AppError::BadRequest(format!(
            "price must be between 0 and {MAX_PRICE}"
        )))
    }
}

/// Where to send a plain form post back to.
///
/// Uses the `Referer` path when it points at this site, so a shopper lands
/// on the page they submitted from. Anything else gets `fallback`, including
/// paths starting with `//`, which a browser would read as another host.
fn return_path(headers: &HeaderMap, base_url: &str, fallback: &str) -> String {
    let same_site = |referer: &Url| {
        Url::parse(base_url).is_ok_and(|base| base.origin() == referer.origin())
            && !referer.path().starts_with("//")
    };

    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Url::parse(v).ok())
        .filter(same_site)
        .map_or_else(
            || fallback.to_owned(),
            |referer| match referer.query() {
                Some(query) => format!("{}?{query}", referer.path()),
                None => referer.path().to_owned(),
            },
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/toggle", post(favorites::toggle))
        .route("/remove", post(favorites::remove))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route("/products", get(admin::products))
        .route("/categories", get(admin::categories))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/categories/{slug}", get(categories::show))
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .route("/currency", post(preferences::set_currency))
        .route("/auth/signout", post(auth::signout))
        .nest("/admin", admin_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_is_htmx() {
        assert!(is_htmx(&headers(&[(
            header::HeaderName::from_static(HX_REQUEST),
            "true"
        )])));
        assert!(!is_htmx(&HeaderMap::new()));
    }

    #[test]
    fn test_return_path_same_site() {
        let h = headers(&[(
            header::REFERER,
            "http://localhost:3000/products?category=jewelry&sort=price-asc",
        )]);
        assert_eq!(
            return_path(&h, "http://localhost:3000", "/cart"),
            "/products?category=jewelry&sort=price-asc"
        );
    }

    #[test]
    fn test_return_path_rejects_other_origins() {
        let h = headers(&[(header::REFERER, "https://evil.example/phish")]);
        assert_eq!(return_path(&h, "http://localhost:3000", "/cart"), "/cart");
        assert_eq!(
            return_path(&HeaderMap::new(), "http://localhost:3000", "/"),
            "/"
        );
    }

    #[test]
    fn test_return_path_rejects_protocol_relative_paths() {
        for referer in [
            "http://localhost:3000//evil.example",
            "http://localhost:3000//evil.example/cart?x=1",
            "http://localhost:3000/\\evil.example",
        ] {
            let h = headers(&[(header::REFERER, referer)]);
            assert_eq!(
                return_path(&h, "http://localhost:3000", "/cart"),
                "/cart",
                "{referer}"
            );
        }
    }

    #[test]
    fn test_checked_price() {
        assert_eq!(checked_price(Decimal::new(7999, 2)).unwrap(), Decimal::new(7999, 2));
        assert!(matches!(
            checked_price(Decimal::new(-1, 0)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            checked_price(Decimal::MAX),
            Err(AppError::BadRequest(_))
        ));
    }
}
