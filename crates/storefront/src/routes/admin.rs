//! Admin dashboard route handlers.
//!
//! Every handler takes [`RequireAdmin`], so a missing user gets the 401 page
//! and a non-admin gets the 403 page before any of this runs.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use magray_arts_core::catalog::{LOW_STOCK_THRESHOLD, Product};
use magray_arts_core::format_price;

use crate::db::{CategoryRepository, DashboardStats, ProductRepository, StatsRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Products shown under "Recently added".
const RECENT_PRODUCTS: usize = 5;

/// Admin sidebar entry.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    pub active: bool,
}

const NAVIGATION: [(&str, &str); 3] = [
    ("Dashboard", "/admin"),
    ("Products", "/admin/products"),
    ("Categories", "/admin/categories"),
];

/// Shared admin chrome: sidebar and signed-in user.
#[derive(Debug, Clone)]
pub struct AdminLayout {
    pub title: &'static str,
    pub admin_name: String,
    pub admin_email: String,
    pub nav: Vec<NavItem>,
}

impl AdminLayout {
    fn new(title: &'static str, admin: &CurrentUser, current_path: &str) -> Self {
        Self {
            title,
            admin_name: admin.display_name().to_owned(),
            admin_email: admin.email.to_string(),
            nav: NAVIGATION
                .iter()
                .map(|(name, href)| NavItem {
                    name,
                    href,
                    active: *href == current_path,
                })
                .collect(),
        }
    }
}

/// A headline figure on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub name: &'static str,
    pub value: String,
}

impl StatCard {
    fn from_stats(stats: &DashboardStats, currency: &str) -> Vec<Self> {
        vec![
            Self {
                name: "Total Products",
                value: stats.product_count.to_string(),
            },
            Self {
                name: "Categories",
                value: stats.category_count.to_string(),
            },
            Self {
                name: "Total Customers",
                value: stats.customer_count.to_string(),
            },
            Self {
                name: "Featured Products",
                value: stats.featured_count.to_string(),
            },
            Self {
                name: "Inventory Value",
                value: format_price(stats.inventory_value, currency),
            },
        ]
    }
}

/// A product row in admin tables.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub category: String,
    pub price: String,
    pub stock: i32,
    pub low_stock: bool,
    pub is_featured: bool,
}

impl ProductRow {
    fn new(product: &Product, category: &str, currency: &str) -> Self {
        Self {
            name: product.name.clone(),
            slug: product.slug.to_string(),
            sku: product.sku.clone(),
            category: category.to_owned(),
            price: format_price(product.price, currency),
            stock: product.stock,
            low_stock: product.is_low_stock(),
            is_featured: product.is_featured,
        }
    }
}

/// A category row in the admin table.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub product_count: i64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub layout: AdminLayout,
    pub stats: Vec<StatCard>,
    pub low_stock: Vec<ProductRow>,
    pub low_stock_threshold: i32,
    pub recent: Vec<ProductRow>,
}

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub layout: AdminLayout,
    pub products: Vec<ProductRow>,
}

/// Category table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/categories.html")]
pub struct CategoriesTemplate {
    pub layout: AdminLayout,
    pub categories: Vec<CategoryRow>,
}

/// Admin dashboard.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<DashboardTemplate, AppError> {
    let currency = state.config().commerce.default_currency.code();
    let stats = StatsRepository::new(state.pool()).dashboard().await?;
    let catalog = state.catalog().await?;

    let products = ProductRepository::new(state.pool());
    let low_stock = products.list_low_stock(LOW_STOCK_THRESHOLD).await?;
    let recent = products.list_all().await?;

    let row = |p: &Product| {
        ProductRow::new(
            p,
            catalog.category_name(p.category_id).unwrap_or_default(),
            currency,
        )
    };

    Ok(DashboardTemplate {
        layout: AdminLayout::new("Dashboard", &admin, "/admin"),
        stats: StatCard::from_stats(&stats, currency),
        low_stock: low_stock.iter().map(row).collect(),
        low_stock_threshold: LOW_STOCK_THRESHOLD,
        recent: recent.iter().take(RECENT_PRODUCTS).map(row).collect(),
    })
}

/// Product table.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<ProductsTemplate, AppError> {
    let currency = state.config().commerce.default_currency.code();
    let categories = CategoryRepository::new(state.pool()).list_all().await?;
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(ProductsTemplate {
        layout: AdminLayout::new("Products", &admin, "/admin/products"),
        products: products
            .iter()
            .map(|p| {
                let category = categories
                    .iter()
                    .find(|c| c.id == p.category_id)
                    .map_or("", |c| c.name.as_str());
                ProductRow::new(p, category, currency)
            })
            .collect(),
    })
}

/// Category table with product counts.
#[instrument(skip_all, fields(admin = %admin.id))]
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<CategoriesTemplate, AppError> {
    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;

    Ok(CategoriesTemplate {
        layout: AdminLayout::new("Categories", &admin, "/admin/categories"),
        categories: categories
            .into_iter()
            .map(|c| CategoryRow {
                name: c.category.name,
                slug: c.category.slug.to_string(),
                description: c.category.description,
                product_count: c.product_count,
            })
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        extract::Request,
        http::StatusCode,
        middleware::{self, Next},
        response::Response,
    };
    use magray_arts_core::{Email, UserId, UserRole};
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

    use super::*;
    use crate::middleware::set_current_user;
    use crate::state::test_state;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            email: Email::parse("shopper@example.com").unwrap(),
            name: None,
            image: None,
            role,
        }
    }

    /// Admin router whose session already holds `signed_in`.
    fn app(signed_in: Option<CurrentUser>) -> Router {
        let sign_in = move |session: Session, request: Request, next: Next| {
            let signed_in = signed_in.clone();
            async move {
                if let Some(user) = signed_in {
                    set_current_user(&session, &user).await.unwrap();
                }
                next.run(request).await
            }
        };

        crate::routes::admin_routes()
            .layer(middleware::from_fn(sign_in))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(test_state())
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_admin_requires_sign_in() {
        for uri in ["/", "/products", "/categories"] {
            let response = get(app(None), uri).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_admin_rejects_customers() {
        let response = get(app(Some(user(UserRole::User))), "/").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Access Denied"));
    }

    #[test]
    fn test_stat_cards() {
        let stats = DashboardStats {
            product_count: 6,
            category_count: 5,
            customer_count: 0,
            featured_count: 4,
            inventory_value: Decimal::new(1_234_567, 2),
        };
        let cards = StatCard::from_stats(&stats, "USD");
        assert_eq!(cards.len(), 5);
        assert_eq!(cards.first().unwrap().value, "6");
        assert_eq!(cards.last().unwrap().value, "$12,345.67");
    }

    #[test]
    fn test_nav_marks_active_page() {
        let layout = AdminLayout::new("Products", &user(UserRole::Admin), "/admin/products");
        let active: Vec<_> = layout.nav.iter().filter(|n| n.active).map(|n| n.name).collect();
        assert_eq!(active, vec!["Products"]);
    }
}
