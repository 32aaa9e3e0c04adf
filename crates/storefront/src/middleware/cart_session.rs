//! Session-backed cart and favorites.
//!
//! [`CartSession`] loads the shopper's [`Store`] from the HTTP session, and
//! [`CartSession::apply`] runs one store operation and writes the persisted
//! subset back before returning. Once `apply` returns `Ok`, the change is
//! durable.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;

use magray_arts_core::CurrencyCode;
use magray_arts_core::store::{PersistedState, Store};

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// The shopper's store, bound to their session.
pub struct CartSession {
    session: Session,
    store: Store,
}

impl CartSession {
    /// Load the store from the session.
    ///
    /// A missing blob gives an empty store in `default_currency`. So does a
    /// blob that cannot be decoded; that case is logged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session backend fails.
    pub async fn load(session: Session, default_currency: CurrencyCode) -> Result<Self, AppError> {
        let fresh = || PersistedState {
            currency: default_currency.code().to_owned(),
            ..PersistedState::default()
        };

        let persisted = match session.get_value(session_keys::STORE).await? {
            None => fresh(),
            Some(value) => decode(value).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable cart state");
                fresh()
            }),
        };

        Ok(Self {
            session,
            store: Store::from_persisted(persisted),
        })
    }

    /// Read-only view of the store.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Run one store operation, then persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written back to the session.
    pub async fn apply<R>(&mut self, op: impl FnOnce(&mut Store) -> R) -> Result<R, AppError> {
        let result = op(&mut self.store);
        self.save().await?;
        Ok(result)
    }

    /// Open or close the cart drawer and mobile menu for this render only.
    pub fn show(&mut self, toggles: &UiToggles) {
        self.store.set_cart_open(toggles.cart_open());
        self.store.set_mobile_menu_open(toggles.menu_open());
    }

    async fn save(&self) -> Result<(), AppError> {
        let json = self
            .store
            .persisted()
            .to_json()
            .map_err(|e| AppError::Internal(format!("failed to encode cart state: {e}")))?;
        self.session.insert(session_keys::STORE, json).await?;
        Ok(())
    }
}

fn decode(value: serde_json::Value) -> Result<PersistedState, serde_json::Error> {
    match value {
        serde_json::Value::String(json) => PersistedState::from_json(&json),
        other => serde_json::from_value(other),
    }
}

impl FromRequestParts<AppState> for CartSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Self::load(session, state.config().commerce.default_currency).await
    }
}

/// UI toggles requested through the query string (`?cart=open`, `?menu=open`).
///
/// These are never persisted; a reload without the parameter closes them.
#[derive(Debug, Default, Deserialize)]
pub struct UiToggles {
    pub cart: Option<String>,
    pub menu: Option<String>,
}

impl UiToggles {
    #[must_use]
    pub fn cart_open(&self) -> bool {
        self.cart.as_deref() == Some("open")
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu.as_deref() == Some("open")
    }
}

impl<S> FromRequestParts<S> for UiToggles
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Query::<Self>::from_request_parts(parts, state)
            .await
            .map(|Query(toggles)| toggles)
            .unwrap_or_default())
    }
}
