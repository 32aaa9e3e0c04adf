//! URL slugs for categories and products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A URL-safe identifier: lowercase ASCII letters, digits and single hyphens.
///
/// Slugs are the unique key for categories and products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse an already-formed slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, has characters outside
    /// `[a-z0-9-]`, or starts/ends with `-`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(bad));
        }
        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from display text, e.g. a product name.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if nothing slug-worthy remains.
    pub fn from_title(text: &str) -> Result<Self, SlugError> {
        let slug = generate_slug(text);
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }
        Self::parse(&slug)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turn display text into a slug.
///
/// Lowercases, drops anything that is not a word character, whitespace or
/// hyphen, collapses whitespace/underscore/hyphen runs into one `-`, and
/// strips hyphens from both ends. Non-ASCII letters are dropped, so
/// `"Papier Mâché"` becomes `"papier-mch"`; the seeded fixtures carry
/// hand-written slugs for that reason.
#[must_use]
pub fn generate_slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_hyphen = true;
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(
            generate_slug("Royal Pashmina Shawl - Burgundy"),
            "royal-pashmina-shawl-burgundy"
        );
        assert_eq!(generate_slug("  Carpets & Rugs "), "carpets-rugs");
        assert_eq!(generate_slug("Kashmir Silk Carpet - 4x6 ft"), "kashmir-silk-carpet-4x6-ft");
        assert_eq!(generate_slug("__Wood__Carvings--"), "wood-carvings");
        assert_eq!(generate_slug("Papier Mâché"), "papier-mch");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert_eq!(Slug::parse("Wood"), Err(SlugError::InvalidCharacter('W')));
        assert_eq!(Slug::parse("-jewelry"), Err(SlugError::EdgeHyphen));
        assert!(Slug::parse("carpets-rugs").is_ok());
    }

    #[test]
    fn test_from_title() {
        assert_eq!(Slug::from_title("Jewelry").unwrap().as_str(), "jewelry");
        assert_eq!(Slug::from_title("&&"), Err(SlugError::Empty));
    }
}
