//! Product listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::{debug, instrument};

use magray_arts_core::catalog::{ListingQuery, Product, SortKey};

use crate::catalog::CatalogSnapshot;
use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::{CartSession, OptionalAuth, UiToggles};
use crate::state::AppState;
use crate::views::{LayoutContext, ProductCard};

/// Related products shown under a product.
const RELATED_PRODUCTS: usize = 4;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    /// Category slug; absent or `all` means every category.
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl ListingParams {
    fn sort_key(&self) -> SortKey {
        self.sort
            .as_deref()
            .map(SortKey::parse_lenient)
            .unwrap_or_default()
    }

    fn category_slug(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty() && *slug != "all")
    }
}

/// An entry in the sort selector.
#[derive(Debug, Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl SortOption {
    pub(crate) fn all(current: SortKey) -> Vec<Self> {
        SortKey::OPTIONS
            .iter()
            .map(|(key, label)| Self {
                value: key.as_str(),
                label,
                selected: *key == current,
            })
            .collect()
    }
}

/// An entry in the category filter.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub slug: String,
    pub name: String,
    pub selected: bool,
}

impl CategoryOption {
    fn all(catalog: &CatalogSnapshot, current: Option<&str>) -> Vec<Self> {
        catalog
            .categories
            .iter()
            .map(|c| Self {
                slug: c.slug.to_string(),
                name: c.name.clone(),
                selected: current == Some(c.slug.as_str()),
            })
            .collect()
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: LayoutContext,
    pub products: Vec<ProductCard>,
    pub search: String,
    pub categories: Vec<CategoryOption>,
    pub all_categories: bool,
    pub sort_options: Vec<SortOption>,
    pub result_label: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutContext,
    pub product: ProductDetail,
    pub related: Vec<ProductCard>,
}

/// Detail fields beyond the listing card.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub card: ProductCard,
    pub description: String,
    pub images: Vec<String>,
    pub sku: String,
    pub stock: i32,
    pub low_stock: bool,
    pub materials: String,
    pub dimensions: String,
    pub weight: String,
    pub category_slug: String,
    pub meta_description: String,
}

impl ProductDetail {
    fn new(product: &Product, catalog: &CatalogSnapshot, card: ProductCard) -> Self {
        Self {
            description: product.description.clone(),
            images: if product.images.is_empty() {
                vec![product.primary_image().to_owned()]
            } else {
                product.images.clone()
            },
            sku: product.sku.clone(),
            stock: product.stock,
            low_stock: product.in_stock() && product.is_low_stock(),
            materials: product.materials.clone(),
            dimensions: product.dimensions.clone(),
            weight: product
                .weight
                .map(|w| format!("{} kg", w.normalize()))
                .unwrap_or_default(),
            category_slug: catalog
                .categories
                .iter()
                .find(|c| c.id == product.category_id)
                .map(|c| c.slug.to_string())
                .unwrap_or_default(),
            meta_description: if product.meta_description.is_empty() {
                card.summary.clone()
            } else {
                product.meta_description.clone()
            },
            card,
        }
    }
}

fn result_label(count: usize) -> String {
    if count == 1 {
        "Showing 1 product".to_string()
    } else {
        format!("Showing {count} products")
    }
}

/// Display the product listing.
///
/// An unknown category slug matches nothing rather than falling back to all.
#[instrument(skip_all, fields(q = ?params.q, category = ?params.category, sort = ?params.sort))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
    Query(params): Query<ListingParams>,
) -> Result<ProductsIndexTemplate, AppError> {
    let catalog = state.catalog().await?;
    cart.show(&toggles);
    let store = cart.store();

    let slug = params.category_slug();
    let query = ListingQuery {
        search: params.q.clone(),
        category: None,
        sort: params.sort_key(),
    };

    let products = match slug {
        None => query.apply(&catalog.products),
        Some(slug) => match catalog.category_by_slug(slug) {
            Some(category) => ListingQuery {
                category: Some(category.id),
                ..query.clone()
            }
            .apply(&catalog.products),
            None => {
                debug!(slug, "Unknown category in listing filter");
                Vec::new()
            }
        },
    };

    Ok(ProductsIndexTemplate {
        layout: LayoutContext::new("Our Products", store, user.as_ref(), "/products"),
        result_label: result_label(products.len()),
        products: ProductCard::list(&products, &catalog, store),
        search: params.q.clone().unwrap_or_default(),
        categories: CategoryOption::all(&catalog, slug),
        all_categories: slug.is_none(),
        sort_options: SortOption::all(query.sort),
    })
}

/// Display a single product.
#[instrument(skip(state, user, toggles, cart))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    toggles: UiToggles,
    mut cart: CartSession,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate, AppError> {
    let product = ProductRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let catalog = state.catalog().await?;
    cart.show(&toggles);
    let store = cart.store();

    let card = ProductCard::new(&product, &catalog, store);
    let path = format!("/products/{}", product.slug);

    Ok(ProductShowTemplate {
        layout: LayoutContext::new(&product.name, store, user.as_ref(), &path),
        related: ProductCard::list(&catalog.related(&product, RELATED_PRODUCTS), &catalog, store),
        product: ProductDetail::new(&product, &catalog, card),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_params_category() {
        let params = |category: Option<&str>| ListingParams {
            category: category.map(str::to_owned),
            ..ListingParams::default()
        };

        assert_eq!(params(None).category_slug(), None);
        assert_eq!(params(Some("all")).category_slug(), None);
        assert_eq!(params(Some("")).category_slug(), None);
        assert_eq!(params(Some("jewelry")).category_slug(), Some("jewelry"));
    }

    #[test]
    fn test_listing_params_sort_falls_back() {
        let params = ListingParams {
            sort: Some("cheapest".to_string()),
            ..ListingParams::default()
        };
        assert_eq!(params.sort_key(), SortKey::Featured);

        let params = ListingParams {
            sort: Some("price-desc".to_string()),
            ..ListingParams::default()
        };
        assert_eq!(params.sort_key(), SortKey::PriceDesc);
    }

    #[test]
    fn test_sort_options_mark_selection() {
        let options = SortOption::all(SortKey::Newest);
        assert_eq!(options.len(), 5);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.first().unwrap().value, "newest");
    }

    #[test]
    fn test_result_label() {
        assert_eq!(result_label(0), "Showing 0 products");
        assert_eq!(result_label(1), "Showing 1 product");
        assert_eq!(result_label(6), "Showing 6 products");
    }
}
