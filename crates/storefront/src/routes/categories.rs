//! Category page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use magray_arts_core::catalog::{ListingQuery, SortKey};

use super::products::SortOption;
use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::middleware::{CartSession, OptionalAuth, UiToggles};
use crate::state::AppState;
use crate::views::{LayoutContext, ProductCard};

/// Sort parameter for the category page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryParams {
    pub sort: Option<String>,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub layout: LayoutContext,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub products: Vec<ProductCard>,
    pub sort_options: Vec<SortOption>,
}

/// Display the products in one category.
#[instrument(skip(state, user, toggles, cart, params))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
    Path(slug): Path<String>,
    Query(params): Query<CategoryParams>,
) -> Result<CategoryShowTemplate, AppError> {
    let category = CategoryRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let catalog = state.catalog().await?;
    cart.show(&toggles);
    let store = cart.store();

    let sort = params
        .sort
        .as_deref()
        .map(SortKey::parse_lenient)
        .unwrap_or_default();
    let products = ListingQuery {
        search: None,
        category: Some(category.id),
        sort,
    }
    .apply(&catalog.products);

    let path = format!("/categories/{}", category.slug);

    Ok(CategoryShowTemplate {
        layout: LayoutContext::new(&category.name, store, user.as_ref(), &path),
        products: ProductCard::list(&products, &catalog, store),
        sort_options: SortOption::all(sort),
        name: category.name,
        slug: category.slug.to_string(),
        description: category.description,
        image: category.image,
    })
}
