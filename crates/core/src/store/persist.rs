//! The durable subset of the store.
//!
//! Only the cart, favorites and currency survive a reload. UI toggles are
//! deliberately absent from this type so they can never be written.

use serde::{Deserialize, Serialize};

use super::items::{CartItem, Favorite};

/// Name under which the persisted blob is stored.
pub const STORAGE_KEY: &str = "magray-arts-store";

/// Currency used when nothing has been chosen yet.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Serialized layout: `{"cartItems": [...], "favorites": [...], "currency": "USD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub cart_items: Vec<CartItem>,
    pub favorites: Vec<Favorite>,
    pub currency: String,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            cart_items: Vec::new(),
            favorites: Vec::new(),
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }
}

impl PersistedState {
    /// Decode a blob written by [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the blob is not valid JSON of this shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
