//! Session-related types.
//!
//! Types stored in the session for authentication state. Sign-in itself is
//! handled outside the storefront; handlers only read what is stored here.

use serde::{Deserialize, Serialize};

use magray_arts_core::{Email, UserId, UserRole};

use super::user::User;

/// Session-stored user identity.
///
/// Serialized as `{id, email, name?, image?, role: "USER" | "ADMIN"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub role: UserRole,
}

impl CurrentUser {
    /// Name if set, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.email.as_str())
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
            role: user.role,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the persisted cart/favorites/currency blob.
    pub const STORE: &str = magray_arts_core::store::STORAGE_KEY;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_session_shape() {
        let user = CurrentUser {
            id: UserId::new(1),
            email: Email::parse("admin@magrayarts.com").unwrap(),
            name: Some("Admin User".to_string()),
            image: None,
            role: UserRole::Admin,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "email": "admin@magrayarts.com",
                "name": "Admin User",
                "role": "ADMIN"
            })
        );

        let back: CurrentUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
        assert!(back.is_admin());
        assert_eq!(back.display_name(), "Admin User");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user: CurrentUser = serde_json::from_str(
            r#"{"id": 7, "email": "shopper@example.com", "role": "USER"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name(), "shopper@example.com");
        assert!(!user.is_admin());
    }
}
