//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{CartSession, OptionalAuth, UiToggles};
use crate::state::AppState;
use crate::views::{CategoryCard, LayoutContext, ProductCard};

/// Number of featured products on the home page.
const FEATURED_PRODUCTS: usize = 4;

/// A selling point under the hero.
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const FEATURES: [Feature; 4] = [
    Feature {
        icon: "truck",
        title: "Free Shipping",
        description: "Free shipping on orders over $100 worldwide",
    },
    Feature {
        icon: "shield",
        title: "Authentic Products",
        description: "100% authentic Kashmiri handicrafts",
    },
    Feature {
        icon: "rotate",
        title: "30-Day Returns",
        description: "Easy returns within 30 days",
    },
    Feature {
        icon: "award",
        title: "Quality Guarantee",
        description: "Handpicked by artisan experts",
    },
];

/// A headline figure in the heritage band.
pub struct Stat {
    pub number: &'static str,
    pub label: &'static str,
}

const STATS: [Stat; 4] = [
    Stat {
        number: "500+",
        label: "Artisan Partners",
    },
    Stat {
        number: "10,000+",
        label: "Happy Customers",
    },
    Stat {
        number: "50+",
        label: "Years of Heritage",
    },
    Stat {
        number: "25+",
        label: "Countries Shipped",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutContext,
    /// Featured products, newest first.
    pub featured: Vec<ProductCard>,
    pub categories: Vec<CategoryCard>,
    pub features: &'static [Feature],
    pub stats: &'static [Stat],
    pub product_count: usize,
    pub category_count: usize,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
) -> Result<HomeTemplate, AppError> {
    let catalog = state.catalog().await?;
    cart.show(&toggles);
    let store = cart.store();

    Ok(HomeTemplate {
        layout: LayoutContext::new("Home", store, user.as_ref(), "/"),
        featured: ProductCard::list(&catalog.featured(FEATURED_PRODUCTS), &catalog, store),
        categories: CategoryCard::list(&catalog),
        features: &FEATURES,
        stats: &STATS,
        product_count: catalog.products.len(),
        category_count: catalog.categories.len(),
    })
}
