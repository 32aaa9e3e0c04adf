//! End-to-end tests for the MagrayArts storefront.
//!
//! The tests in `tests/` talk HTTP to a storefront that is already running
//! against a migrated and seeded database. They are `#[ignore]`d by default.
//!
//! ```bash
//! ma-cli migrate && ma-cli seed
//! cargo run -p magray-arts-storefront &
//! cargo test -p magray-arts-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` points the tests at another host
//! (default: `http://localhost:3000`).

use reqwest::redirect::Policy;
use reqwest::{Client, Response};

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_owned())
        .unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Absolute URL for `path` on the storefront.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A browser-like client: keeps the session cookie and does not follow
/// redirects, so tests can assert on `Location`.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn client() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
}

/// Where a redirect points, if it is one.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
