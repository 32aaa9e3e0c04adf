//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use magray_arts_core::catalog::NewUser;
use magray_arts_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str =
    "id, email, name, image, role, phone, address, city, country, postal_code, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: Option<String>,
    image: Option<String>,
    role: UserRole,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            image: row.image,
            role: row.role,
            phone: row.phone,
            address: row.address,
            city: row.city,
            country: row.country,
            postal_code: row.postal_code,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {USER_COLUMNS} FROM storefront."user" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a user unless one with the same email exists.
    ///
    /// Returns `true` if a row was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert_if_absent(&self, user: &NewUser) -> Result<bool, RepositoryError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO storefront."user" (
                email, name, role, phone, address, city, country, postal_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.city)
        .bind(&user.country)
        .bind(&user.postal_code)
        .fetch_optional(self.pool)
        .await?;

        Ok(inserted.is_some())
    }
}
