//! Core types for MagrayArts.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod slug;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, format_price};
pub use role::UserRole;
pub use slug::{Slug, SlugError, generate_slug};
