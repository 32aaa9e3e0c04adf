//! HTTP middleware and request extractors for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! # Extractors
//!
//! - [`CartSession`] - the shopper's cart/favorites store, saved after each operation
//! - [`UiToggles`] - per-render cart drawer / mobile menu state
//! - [`OptionalAuth`] / [`RequireAdmin`] - session user and admin gate

pub mod auth;
pub mod cart_session;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, clear_current_user, set_current_user};
pub use cart_session::{CartSession, UiToggles};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
