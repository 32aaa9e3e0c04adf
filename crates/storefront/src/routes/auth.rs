//! Sign-out handler.
//!
//! Signing in happens elsewhere; the storefront only drops the session user.

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::clear_sentry_user;
use crate::middleware::clear_current_user;

/// Clear the signed-in user and go home.
///
/// The cart and favorites stay with the browser session.
#[instrument(skip(session))]
pub async fn signout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {e}");
    }

    // New ID so a captured cookie no longer carries the old identity.
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
    }

    clear_sentry_user();
    Redirect::to("/").into_response()
}
