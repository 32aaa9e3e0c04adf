//! MagrayArts Core - Shared types and storefront logic.
//!
//! This crate provides the domain types and pure logic used by every
//! MagrayArts component:
//! - `storefront` - Public-facing shop and role-gated admin dashboard
//! - `cli` - Command-line tools for migrations and demo-data seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Persistence of the cart store is a serialization boundary
//! ([`store::PersistedState`]); where the bytes go is the caller's concern.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, slugs, prices and roles
//! - [`store`] - The cart/favorites store and its persisted snapshot
//! - [`catalog`] - Catalog records, fixture validation and listing filter/sort
//! - [`pricing`] - Tax, shipping, order summaries and text helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod pricing;
pub mod store;
pub mod types;

pub use types::*;
