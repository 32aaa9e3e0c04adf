//! Seed fixture sets and their uniqueness checks.

use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;

use super::{NewCategory, NewProduct, NewUser};

/// Problems found in a fixture set before anything touches the database.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixtureError {
    #[error("duplicate category slug: {0}")]
    DuplicateCategorySlug(String),
    #[error("duplicate product slug: {0}")]
    DuplicateProductSlug(String),
    #[error("duplicate product sku: {0}")]
    DuplicateSku(String),
    #[error("duplicate user email: {0}")]
    DuplicateEmail(String),
    #[error("product {product} references unknown category {category}")]
    UnknownCategory { product: String, category: String },
    #[error("product {0} has a negative price or stock")]
    NegativeAmount(String),
}

/// Everything the seed command inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFixtures {
    pub users: Vec<NewUser>,
    pub categories: Vec<NewCategory>,
    pub products: Vec<NewProduct>,
}

impl CatalogFixtures {
    /// Check unique keys (category slug, product slug, sku, email) and
    /// product → category references.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut emails = HashSet::new();
        for user in &self.users {
            if !emails.insert(user.email.as_str()) {
                return Err(FixtureError::DuplicateEmail(user.email.to_string()));
            }
        }

        let mut category_slugs = HashSet::new();
        for category in &self.categories {
            if !category_slugs.insert(category.slug.as_str()) {
                return Err(FixtureError::DuplicateCategorySlug(category.slug.to_string()));
            }
        }

        let mut product_slugs = HashSet::new();
        let mut skus = HashSet::new();
        for product in &self.products {
            if !product_slugs.insert(product.slug.as_str()) {
                return Err(FixtureError::DuplicateProductSlug(product.slug.to_string()));
            }
            if !skus.insert(product.sku.as_str()) {
                return Err(FixtureError::DuplicateSku(product.sku.clone()));
            }
            if !category_slugs.contains(product.category_slug.as_str()) {
                return Err(FixtureError::UnknownCategory {
                    product: product.slug.to_string(),
                    category: product.category_slug.to_string(),
                });
            }
            if product.price < Decimal::ZERO || product.stock < 0 {
                return Err(FixtureError::NegativeAmount(product.slug.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Email, Slug, UserRole};

    fn category(slug: &str) -> NewCategory {
        NewCategory {
            name: slug.to_uppercase(),
            description: String::new(),
            slug: Slug::parse(slug).unwrap(),
            image: String::new(),
        }
    }

    fn product(slug: &str, sku: &str, category: &str) -> NewProduct {
        NewProduct {
            name: slug.to_owned(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            compare_price: None,
            images: Vec::new(),
            slug: Slug::parse(slug).unwrap(),
            sku: sku.to_owned(),
            stock: 1,
            is_featured: false,
            materials: String::new(),
            dimensions: String::new(),
            weight: None,
            category_slug: Slug::parse(category).unwrap(),
            meta_title: String::new(),
            meta_description: String::new(),
        }
    }

    fn user(email: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            name: None,
            role: UserRole::Admin,
            phone: None,
            address: None,
            city: None,
            country: None,
            postal_code: None,
        }
    }

    fn valid() -> CatalogFixtures {
        CatalogFixtures {
            users: vec![user("admin@magrayarts.com")],
            categories: vec![category("jewelry"), category("wood-carvings")],
            products: vec![
                product("silver-set", "JW-1", "jewelry"),
                product("elephant", "WD-1", "wood-carvings"),
            ],
        }
    }

    #[test]
    fn test_valid_fixtures_pass() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let mut fixtures = valid();
        fixtures.categories.push(category("jewelry"));
        assert_eq!(
            fixtures.validate(),
            Err(FixtureError::DuplicateCategorySlug("jewelry".into()))
        );

        let mut fixtures = valid();
        fixtures.products.push(product("elephant", "WD-2", "wood-carvings"));
        assert_eq!(
            fixtures.validate(),
            Err(FixtureError::DuplicateProductSlug("elephant".into()))
        );

        let mut fixtures = valid();
        fixtures.products.push(product("elephant-2", "WD-1", "wood-carvings"));
        assert_eq!(fixtures.validate(), Err(FixtureError::DuplicateSku("WD-1".into())));

        let mut fixtures = valid();
        fixtures.users.push(user("ADMIN@magrayarts.com"));
        assert!(matches!(fixtures.validate(), Err(FixtureError::DuplicateEmail(_))));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut fixtures = valid();
        fixtures.products.push(product("rug", "CP-1", "carpets-rugs"));
        assert!(matches!(
            fixtures.validate(),
            Err(FixtureError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let mut fixtures = valid();
        let mut broken = product("box", "PM-1", "jewelry");
        broken.stock = -1;
        fixtures.products.push(broken);
        assert_eq!(fixtures.validate(), Err(FixtureError::NegativeAmount("box".into())));
    }
}
