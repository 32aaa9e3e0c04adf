//! Display preference handlers.

use axum::{Form, extract::State, http::HeaderMap, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use magray_arts_core::CurrencyCode;

use super::return_path;
use crate::error::AppError;
use crate::middleware::CartSession;
use crate::state::AppState;

/// Currency selector form data.
#[derive(Debug, Deserialize)]
pub struct CurrencyForm {
    pub currency: String,
}

/// Change the display currency.
///
/// Only amounts are re-labelled; prices are not converted.
///
/// # Errors
///
/// Returns `BadRequest` for a currency the selector does not offer.
#[instrument(skip(state, cart, headers))]
pub async fn set_currency(
    State(state): State<AppState>,
    mut cart: CartSession,
    headers: HeaderMap,
    Form(form): Form<CurrencyForm>,
) -> Result<Redirect, AppError> {
    let currency: CurrencyCode = form.currency.parse().map_err(AppError::BadRequest)?;
    cart.apply(|store| store.set_currency(currency.code())).await?;

    let back = return_path(&headers, &state.config().base_url, "/");
    Ok(Redirect::to(&back))
}
