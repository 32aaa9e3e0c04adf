//! Cart route handlers.
//!
//! Mutations answer HTMX requests with a fragment and plain form posts with a
//! redirect. Each one goes through [`CartSession::apply`], so the cart is
//! saved before the response is built.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use magray_arts_core::store::NewCartItem;

use super::{checked_price, is_htmx, return_path};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{CartSession, OptionalAuth, UiToggles};
use crate::state::AppState;
use crate::views::{CartView, LayoutContext, SummaryView};

/// Event HTMX listeners use to refresh the count badge and drawer.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Add to cart form data.
///
/// The display fields travel with the request so the cart renders without a
/// catalog lookup.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub slug: String,
}

impl From<AddToCartForm> for NewCartItem {
    fn from(form: AddToCartForm) -> Self {
        Self {
            id: form.id,
            name: form.name,
            price: form.price,
            image: form.image,
            slug: form.slug,
        }
    }
}

/// Update cart form data. A quantity of zero or less removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutContext,
    pub cart: CartView,
    pub summary: SummaryView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub summary: SummaryView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Render the items fragment for HTMX, or send a plain form back to the cart.
async fn items_response(
    state: &AppState,
    cart: &CartSession,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    if !is_htmx(headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    let catalog = state.catalog().await?;
    let store = cart.store();
    Ok((
        AppendHeaders([CART_UPDATED]),
        CartItemsTemplate {
            cart: CartView::new(store),
            summary: SummaryView::new(store, &catalog, &state.config().commerce),
        },
    )
        .into_response())
}

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
) -> Result<CartShowTemplate, AppError> {
    let catalog = state.catalog().await?;
    cart.show(&toggles);
    let store = cart.store();

    Ok(CartShowTemplate {
        layout: LayoutContext::new("Shopping Cart", store, user.as_ref(), "/cart"),
        cart: CartView::new(store),
        summary: SummaryView::new(store, &catalog, &state.config().commerce),
    })
}

/// Add item to cart.
///
/// Adding an item already in the cart bumps its quantity by one. HTMX gets the
/// new count badge plus a `cart-updated` trigger.
#[instrument(skip(state, cart, headers), fields(product_id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    checked_price(form.price)?;
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", form.id.as_str())]));

    let count = cart
        .apply(|store| {
            store.add_to_cart(form.into());
            store.cart_items_count()
        })
        .await?;
    debug!(count, "Cart updated");

    if is_htmx(&headers) {
        return Ok((AppendHeaders([CART_UPDATED]), CartCountTemplate { count }).into_response());
    }

    let back = return_path(&headers, &state.config().base_url, "/cart");
    Ok(Redirect::to(&back).into_response())
}

/// Update cart item quantity.
#[instrument(skip(state, cart, headers))]
pub async fn update(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    cart.apply(|store| store.update_cart_item_quantity(&form.id, form.quantity))
        .await?;
    items_response(&state, &cart, &headers).await
}

/// Remove item from cart.
#[instrument(skip(state, cart, headers))]
pub async fn remove(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    cart.apply(|store| store.remove_from_cart(&form.id)).await?;
    items_response(&state, &cart, &headers).await
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    cart.apply(|store| store.clear_cart()).await?;
    items_response(&state, &cart, &headers).await
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(cart: CartSession) -> CartCountTemplate {
    CartCountTemplate {
        count: cart.store().cart_items_count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_form_into_cart_item() {
        let form: AddToCartForm = parse_form(
            "id=4&name=Papier+M%C3%A2ch%C3%A9+Decorative+Box&price=79.99&slug=papier-mache-decorative-box",
        );
        let item = NewCartItem::from(form);
        assert_eq!(item.id, "4");
        assert_eq!(item.name, "Papier Mâché Decorative Box");
        assert_eq!(item.price, Decimal::new(7999, 2));
        assert_eq!(item.image, "");
    }

    #[test]
    fn test_update_form_accepts_zero_and_negative() {
        let form: UpdateCartForm = parse_form("id=1&quantity=-3");
        assert_eq!(form.quantity, -3);
    }

    async fn post_add(body: &'static str, htmx: bool) -> axum::response::Response {
        use axum::body::Body;
        use axum::http::{Request, header};
        use tower::ServiceExt;
        use tower_sessions::{MemoryStore, SessionManagerLayer};

        let mut request = Request::post("/add")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if htmx {
            request = request.header("hx-request", "true");
        }

        crate::routes::cart_routes()
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(crate::state::test_state())
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_price() {
        for body in [
            "id=x&name=Overflow&price=79228162514264337593543950335",
            "id=x&name=Overflow&price=100000000",
            "id=x&name=Refund&price=-5.00",
        ] {
            let response = post_add(body, false).await;
            assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST, "{body}");
        }
    }

    #[tokio::test]
    async fn test_add_redirects_plain_forms_and_answers_htmx() {
        let response = post_add("id=4&name=Box&price=79.99", false).await;
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/cart");

        let response = post_add("id=4&name=Box&price=79.99", true).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(response.headers().get("hx-trigger").unwrap(), "cart-updated");
    }

    fn parse_form<T: serde::de::DeserializeOwned>(body: &str) -> T {
        let query = axum::extract::Query::<T>::try_from_uri(
            &format!("http://localhost/?{body}").parse().unwrap(),
        )
        .unwrap();
        query.0
    }
}
