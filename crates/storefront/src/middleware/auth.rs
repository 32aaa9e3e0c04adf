//! Authentication extractors.
//!
//! The storefront never signs anyone in. It reads the user another service
//! stored in the session under `current_user`, and gates the admin panel on
//! that user's role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::warn;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that optionally gets the current user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that admits only users with the `ADMIN` role.
///
/// The session's role is checked first, then confirmed against the database
/// so a demoted or deleted account loses access immediately.
pub struct RequireAdmin(pub CurrentUser);

/// Why an admin page was refused.
#[derive(Debug)]
pub enum AdminRejection {
    /// No user in the session (401).
    SignInRequired,
    /// Signed in without the admin role (403).
    Forbidden,
    /// The role check itself failed.
    Error(AppError),
}

/// Access denied page for the admin panel.
#[derive(Template, WebTemplate)]
#[template(path = "admin/denied.html")]
pub struct AccessDeniedTemplate {
    pub message: &'static str,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SignInRequired => (
                StatusCode::UNAUTHORIZED,
                AccessDeniedTemplate {
                    message: "You need to sign in to access the admin panel.",
                },
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                AccessDeniedTemplate {
                    message: "You don't have permission to access the admin panel.",
                },
            )
                .into_response(),
            Self::Error(err) => err.into_response(),
        }
    }
}

/// Decide admin access from the session user alone.
///
/// # Errors
///
/// Returns `SignInRequired` without a user and `Forbidden` for non-admins.
pub fn check_admin(user: Option<CurrentUser>) -> Result<CurrentUser, AdminRejection> {
    let user = user.ok_or(AdminRejection::SignInRequired)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(AdminRejection::Forbidden)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(OptionalAuth(user)) = OptionalAuth::from_request_parts(parts, state).await;
        let user = check_admin(user)?;

        let stored = UserRepository::new(state.pool())
            .get_by_id(user.id)
            .await
            .map_err(|e| AdminRejection::Error(e.into()))?;

        match stored {
            Some(stored) if stored.role.is_admin() => {
                set_sentry_user(&user.id, Some(user.email.as_str()));
                Ok(Self(user))
            }
            _ => {
                warn!(user_id = %user.id, "Session claims admin role the database does not confirm");
                Err(AdminRejection::Forbidden)
            }
        }
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// The cart stays; it belongs to the browser session, not the account.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
