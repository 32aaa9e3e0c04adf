//! Seed the database with the demo catalog.
//!
//! Inserts one admin account, five categories and six products. Every insert
//! is skipped when a row with the same unique key (email or slug) already
//! exists, so the command is safe to run repeatedly. There is no wrapping
//! transaction: a failure part-way keeps the rows inserted before it.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use std::fmt;

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};

use magray_arts_core::catalog::{CatalogFixtures, FixtureError, NewCategory, NewProduct, NewUser};
use magray_arts_core::{Email, Slug, UserRole};
use magray_arts_storefront::db::{
    self, CategoryRepository, ProductRepository, RepositoryError, UserRepository,
};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Fixture check failed: {0}")]
    Fixture(#[from] FixtureError),

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Created/skipped counts for one kind of record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub existing: usize,
}

impl Tally {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

/// What a seed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: Tally,
    pub categories: Tally,
    pub products: Tally,
}

impl SeedReport {
    /// Records inserted across all kinds.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.users.created + self.categories.created + self.products.created
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "users {}/{}, categories {}/{}, products {}/{} (created/existing)",
            self.users.created,
            self.users.existing,
            self.categories.created,
            self.categories.existing,
            self.products.created,
            self.products.existing,
        )
    }
}

/// Validate the demo fixtures without connecting to the database.
///
/// # Errors
///
/// Returns an error if a fixture is malformed or a unique key repeats.
pub fn check() -> Result<(), SeedError> {
    let fixtures = demo_fixtures()?;
    fixtures.validate()?;
    info!(
        users = fixtures.users.len(),
        categories = fixtures.categories.len(),
        products = fixtures.products.len(),
        "Fixtures are valid"
    );
    Ok(())
}

/// Connect and seed the demo catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the fixtures are invalid,
/// or any insert fails.
pub async fn run() -> Result<SeedReport, SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    let fixtures = demo_fixtures()?;
    fixtures.validate()?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    seed(&pool, &fixtures).await
}

/// Insert every fixture that is not already present.
///
/// Categories go in before products, which look their category up by slug.
///
/// # Errors
///
/// Returns the first database error; earlier inserts stay.
#[instrument(skip_all)]
pub async fn seed(pool: &PgPool, fixtures: &CatalogFixtures) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let users = UserRepository::new(pool);
    for user in &fixtures.users {
        report.users.record(users.insert_if_absent(user).await?);
    }
    info!(created = report.users.created, "Users seeded");

    let categories = CategoryRepository::new(pool);
    for category in &fixtures.categories {
        report
            .categories
            .record(categories.insert_if_absent(category).await?);
    }
    info!(created = report.categories.created, "Categories seeded");

    let products = ProductRepository::new(pool);
    for product in &fixtures.products {
        let category_id = categories.id_for_slug(&product.category_slug).await?;
        report
            .products
            .record(products.insert_if_absent(product, category_id).await?);
    }
    info!(created = report.products.created, "Products seeded");

    Ok(report)
}

fn slug(s: &str) -> Result<Slug, SeedError> {
    Slug::parse(s).map_err(|e| SeedError::InvalidFixture(format!("slug {s}: {e}")))
}

fn images(paths: &[&str]) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("/static/images/products/{p}"))
        .collect()
}

/// The demo catalog.
///
/// # Errors
///
/// Returns `InvalidFixture` if a slug or email in the data does not parse.
pub fn demo_fixtures() -> Result<CatalogFixtures, SeedError> {
    let admin_email = "admin@magrayarts.com";

    let users = vec![NewUser {
        email: Email::parse(admin_email)
            .map_err(|e| SeedError::InvalidFixture(format!("email {admin_email}: {e}")))?,
        name: Some("Admin User".to_string()),
        role: UserRole::Admin,
        phone: Some("+1-555-0123".to_string()),
        address: Some("123 Admin Street".to_string()),
        city: Some("Srinagar".to_string()),
        country: Some("India".to_string()),
        postal_code: Some("190001".to_string()),
    }];

    let category = |name: &str, description: &str, slug_text: &str, image: &str| {
        Ok::<_, SeedError>(NewCategory {
            name: name.to_string(),
            description: description.to_string(),
            slug: slug(slug_text)?,
            image: format!("/static/images/categories/{image}"),
        })
    };

    let categories = vec![
        category(
            "Pashmina Shawls",
            "Luxurious handwoven Pashmina shawls from Kashmir",
            "pashmina-shawls",
            "pashmina.jpg",
        )?,
        category(
            "Carpets & Rugs",
            "Exquisite hand-knotted Kashmir carpets and rugs",
            "carpets-rugs",
            "carpets.jpg",
        )?,
        category(
            "Wood Carvings",
            "Traditional walnut wood carvings and sculptures",
            "wood-carvings",
            "wood.jpg",
        )?,
        category(
            "Papier Mâché",
            "Colorful papier mâché decorative items",
            "papier-mache",
            "papier.jpg",
        )?,
        category(
            "Jewelry",
            "Traditional Kashmiri jewelry and accessories",
            "jewelry",
            "jewelry.jpg",
        )?,
    ];

    let products = vec![
        NewProduct {
            name: "Royal Pashmina Shawl - Burgundy".to_string(),
            description: "Exquisite handwoven Pashmina shawl made from the finest goat wool. \
                This burgundy masterpiece features intricate paisley patterns and represents \
                centuries of Kashmiri craftsmanship."
                .to_string(),
            price: Decimal::new(29999, 2),
            compare_price: Some(Decimal::new(39999, 2)),
            images: images(&["pashmina1-1.jpg", "pashmina1-2.jpg"]),
            slug: slug("royal-pashmina-shawl-burgundy")?,
            sku: "PS-ROY-BUR-001".to_string(),
            stock: 15,
            is_featured: true,
            materials: "100% Pure Pashmina Wool".to_string(),
            dimensions: "200cm x 70cm".to_string(),
            weight: Some(Decimal::new(2, 1)),
            category_slug: slug("pashmina-shawls")?,
            meta_title: "Royal Burgundy Pashmina Shawl | Authentic Kashmir".to_string(),
            meta_description: "Luxury Pashmina shawl in burgundy with paisley patterns. \
                Handwoven by master artisans in Kashmir."
                .to_string(),
        },
        NewProduct {
            name: "Kashmir Silk Carpet - 4x6 ft".to_string(),
            description: "Hand-knotted silk carpet featuring traditional Kashmiri motifs. \
                Each knot is carefully placed by skilled artisans, creating a timeless piece \
                of art for your home."
                .to_string(),
            price: Decimal::new(129_999, 2),
            compare_price: Some(Decimal::new(159_999, 2)),
            images: images(&["carpet1-1.jpg", "carpet1-2.jpg"]),
            slug: slug("kashmir-silk-carpet-4x6")?,
            sku: "CP-SLK-46-001".to_string(),
            stock: 8,
            is_featured: true,
            materials: "100% Pure Silk".to_string(),
            dimensions: "4ft x 6ft".to_string(),
            weight: Some(Decimal::new(55, 1)),
            category_slug: slug("carpets-rugs")?,
            meta_title: "Kashmir Silk Carpet 4x6 ft | Hand-knotted Luxury".to_string(),
            meta_description: "Authentic hand-knotted Kashmir silk carpet with traditional \
                motifs. Premium quality and craftsmanship."
                .to_string(),
        },
        NewProduct {
            name: "Walnut Wood Elephant Sculpture".to_string(),
            description: "Beautifully carved walnut wood elephant sculpture showcasing the \
                intricate woodworking skills of Kashmiri artisans. Perfect as a decorative \
                piece or gift."
                .to_string(),
            price: Decimal::new(14999, 2),
            compare_price: Some(Decimal::new(19999, 2)),
            images: images(&["wood1-1.jpg", "wood1-2.jpg"]),
            slug: slug("walnut-wood-elephant-sculpture")?,
            sku: "WD-ELE-WAL-001".to_string(),
            stock: 25,
            is_featured: true,
            materials: "Premium Walnut Wood".to_string(),
            dimensions: "15cm x 10cm x 8cm".to_string(),
            weight: Some(Decimal::new(8, 1)),
            category_slug: slug("wood-carvings")?,
            meta_title: "Walnut Wood Elephant Sculpture | Kashmir Handicraft".to_string(),
            meta_description: "Hand-carved walnut wood elephant sculpture from Kashmir. \
                Exquisite detail and craftsmanship."
                .to_string(),
        },
        NewProduct {
            name: "Papier Mâché Decorative Box".to_string(),
            description: "Vibrant papier mâché decorative box with traditional Kashmiri \
                floral patterns. Hand-painted with natural colors and finished with gold \
                accents."
                .to_string(),
            price: Decimal::new(7999, 2),
            compare_price: Some(Decimal::new(9999, 2)),
            images: images(&["papier1-1.jpg", "papier1-2.jpg"]),
            slug: slug("papier-mache-decorative-box")?,
            sku: "PM-BOX-DEC-001".to_string(),
            stock: 30,
            is_featured: true,
            materials: "Papier Mâché, Natural Colors".to_string(),
            dimensions: "20cm x 15cm x 8cm".to_string(),
            weight: Some(Decimal::new(3, 1)),
            category_slug: slug("papier-mache")?,
            meta_title: "Papier Mâché Decorative Box | Traditional Kashmir Art".to_string(),
            meta_description: "Hand-painted papier mâché decorative box with floral patterns. \
                Authentic Kashmiri craftsmanship."
                .to_string(),
        },
        NewProduct {
            name: "Pashmina Shawl - Cream with Gold Border".to_string(),
            description: "Elegant cream-colored Pashmina shawl with hand-embroidered gold \
                border. Perfect for special occasions and formal wear."
                .to_string(),
            price: Decimal::new(24999, 2),
            compare_price: Some(Decimal::new(32999, 2)),
            images: images(&["pashmina2-1.jpg", "pashmina2-2.jpg"]),
            slug: slug("pashmina-shawl-cream-gold-border")?,
            sku: "PS-CRM-GLD-002".to_string(),
            stock: 20,
            is_featured: false,
            materials: "100% Pure Pashmina Wool, Gold Thread".to_string(),
            dimensions: "200cm x 70cm".to_string(),
            weight: Some(Decimal::new(25, 2)),
            category_slug: slug("pashmina-shawls")?,
            meta_title: "Cream Pashmina Shawl with Gold Border | Luxury Kashmir".to_string(),
            meta_description: "Elegant cream Pashmina shawl with hand-embroidered gold border. \
                Perfect for special occasions."
                .to_string(),
        },
        NewProduct {
            name: "Traditional Kashmiri Silver Jewelry Set".to_string(),
            description: "Complete silver jewelry set including necklace, earrings, and \
                bracelet. Features traditional Kashmiri designs with semi-precious stones."
                .to_string(),
            price: Decimal::new(18999, 2),
            compare_price: Some(Decimal::new(24999, 2)),
            images: images(&["jewelry1-1.jpg", "jewelry1-2.jpg"]),
            slug: slug("traditional-kashmiri-silver-jewelry-set")?,
            sku: "JW-SLV-SET-001".to_string(),
            stock: 12,
            is_featured: false,
            materials: "925 Sterling Silver, Semi-precious Stones".to_string(),
            dimensions: "Necklace: 45cm, Earrings: 3cm".to_string(),
            weight: Some(Decimal::new(1, 1)),
            category_slug: slug("jewelry")?,
            meta_title: "Traditional Kashmiri Silver Jewelry Set | Authentic Design".to_string(),
            meta_description: "Complete silver jewelry set with traditional Kashmiri designs \
                and semi-precious stones."
                .to_string(),
        },
    ];

    Ok(CatalogFixtures {
        users,
        categories,
        products,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fixtures_are_valid() {
        let fixtures = demo_fixtures().unwrap();
        assert_eq!(fixtures.users.len(), 1);
        assert_eq!(fixtures.categories.len(), 5);
        assert_eq!(fixtures.products.len(), 6);
        fixtures.validate().unwrap();
        check().unwrap();
    }

    #[test]
    fn test_demo_admin() {
        let fixtures = demo_fixtures().unwrap();
        let admin = fixtures.users.first().unwrap();
        assert_eq!(admin.email.as_str(), "admin@magrayarts.com");
        assert!(admin.role.is_admin());
    }

    #[test]
    fn test_demo_prices() {
        let fixtures = demo_fixtures().unwrap();
        let prices: Vec<String> = fixtures
            .products
            .iter()
            .map(|p| p.price.to_string())
            .collect();
        assert_eq!(
            prices,
            vec!["299.99", "1299.99", "149.99", "79.99", "249.99", "189.99"]
        );
        assert_eq!(
            fixtures.products.iter().filter(|p| p.is_featured).count(),
            4
        );
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut fixtures = demo_fixtures().unwrap();
        let copy = fixtures.products.first().unwrap().clone();
        fixtures.products.push(NewProduct {
            sku: "PS-ROY-BUR-999".to_string(),
            ..copy
        });

        assert!(matches!(
            fixtures.validate(),
            Err(FixtureError::DuplicateProductSlug(slug)) if slug == "royal-pashmina-shawl-burgundy"
        ));
    }

    #[test]
    fn test_tally_and_report() {
        let mut report = SeedReport::default();
        report.categories.record(true);
        report.categories.record(false);
        report.products.record(true);

        assert_eq!(report.created(), 2);
        assert_eq!(
            report.to_string(),
            "users 0/0, categories 1/1, products 1/0 (created/existing)"
        );
    }
}
