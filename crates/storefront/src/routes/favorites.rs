//! Favorites route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use magray_arts_core::store::Favorite;

use super::{checked_price, is_htmx, return_path};
use crate::error::AppError;
use crate::middleware::{CartSession, OptionalAuth, UiToggles};
use crate::state::AppState;
use crate::views::{FavoriteButton, FavoriteView, LayoutContext};

/// Favorite toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteForm {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub slug: String,
}

/// Remove favorite form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFavoriteForm {
    pub id: String,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/index.html")]
pub struct FavoritesTemplate {
    pub layout: LayoutContext,
    pub favorites: Vec<FavoriteView>,
}

/// Heart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_button.html")]
pub struct FavoriteButtonTemplate {
    pub button: FavoriteButton,
}

/// Display the favorites page.
#[instrument(skip_all)]
pub async fn index(
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
) -> FavoritesTemplate {
    cart.show(&toggles);
    let store = cart.store();

    FavoritesTemplate {
        layout: LayoutContext::new("Favorites", store, user.as_ref(), "/favorites"),
        favorites: store
            .favorites()
            .iter()
            .map(|f| FavoriteView::new(f, store.currency()))
            .collect(),
    }
}

/// Add or remove a favorite.
///
/// HTMX gets the redrawn heart button; a plain form goes back where it came from.
#[instrument(skip(state, cart, headers), fields(product_id = %form.id))]
pub async fn toggle(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
    Form(form): Form<ToggleFavoriteForm>,
) -> Result<Response, AppError> {
    let favorite = Favorite {
        price: checked_price(form.price)?,
        id: form.id,
        name: form.name,
        image: form.image,
        slug: form.slug,
    };
    let button = FavoriteButton {
        id: favorite.id.clone(),
        name: favorite.name.clone(),
        slug: favorite.slug.clone(),
        image: favorite.image.clone(),
        price_raw: favorite.price.to_string(),
        is_favorite: false,
    };

    let is_favorite = cart.apply(|store| store.toggle_favorite(favorite)).await?;
    debug!(is_favorite, "Favorite toggled");

    if is_htmx(&headers) {
        return Ok(FavoriteButtonTemplate {
            button: FavoriteButton {
                is_favorite,
                ..button
            },
        }
        .into_response());
    }

    let back = return_path(&headers, &state.config().base_url, "/favorites");
    Ok(Redirect::to(&back).into_response())
}

/// Remove a favorite from the favorites page.
#[instrument(skip(cart))]
pub async fn remove(
    mut cart: CartSession,
    Form(form): Form<RemoveFavoriteForm>,
) -> Result<Redirect, AppError> {
    cart.apply(|store| store.remove_from_favorites(&form.id)).await?;
    Ok(Redirect::to("/favorites"))
}
