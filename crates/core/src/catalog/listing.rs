//! Product listing filter and sort.

use core::str::FromStr;

use serde::Deserialize;

use super::Product;
use crate::types::CategoryId;

/// Sort order for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Featured products first, otherwise catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Most recently added first.
    Newest,
    Name,
}

impl SortKey {
    /// All keys with their selector labels.
    pub const OPTIONS: [(Self, &'static str); 5] = [
        (Self::Featured, "Featured"),
        (Self::PriceAsc, "Price: Low to High"),
        (Self::PriceDesc, "Price: High to Low"),
        (Self::Newest, "Newest"),
        (Self::Name, "Name"),
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
            Self::Name => "name",
        }
    }

    /// Parse a query-string value. Unknown values fall back to `Featured`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .iter()
            .map(|(key, _)| *key)
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

/// Search, category filter and sort for the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring over name and description. Blank matches all.
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub sort: SortKey,
}

impl ListingQuery {
    /// Whether a product passes the search and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category
            && product.category_id != category
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
        }
    }

    /// Filter and sort. Sorting is stable, so ties keep catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut out: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();

        match self.sort {
            SortKey::Featured => out.sort_by_key(|p| !p.is_featured),
            SortKey::PriceAsc => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceDesc => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Name => out.sort_by_cached_key(|p| p.name.to_lowercase()),
        }

        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Royal Pashmina Shawl", 29999, true, 1),
            product(2, "Kashmir Silk Carpet", 129_999, true, 2),
            product(3, "Cream Pashmina Shawl", 24999, false, 1),
            product(4, "Silver Jewelry Set", 18999, false, 5),
            product(5, "Papier Mache Box", 7999, true, 4),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_default_query_puts_featured_first_stably() {
        let products = catalog();
        let out = ListingQuery::default().apply(&products);
        assert_eq!(ids(&out), [1, 2, 5, 3, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let products = catalog();
        let query = ListingQuery {
            search: Some("PASHMINA".into()),
            ..ListingQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), [1, 3]);

        let query = ListingQuery {
            search: Some("handmade royal".into()),
            ..ListingQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), [1]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let products = catalog();
        let query = ListingQuery {
            search: Some("   ".into()),
            ..ListingQuery::default()
        };
        assert_eq!(query.apply(&products).len(), products.len());
    }

    #[test]
    fn test_category_filter_with_price_sort() {
        let products = catalog();
        let query = ListingQuery {
            category: Some(CategoryId::new(1)),
            sort: SortKey::PriceAsc,
            ..ListingQuery::default()
        };
        assert_eq!(ids(&query.apply(&products)), [3, 1]);
    }

    #[test]
    fn test_price_and_date_orders() {
        let products = catalog();
        let sorted = |sort| ListingQuery {
            sort,
            ..ListingQuery::default()
        };
        assert_eq!(ids(&sorted(SortKey::PriceAsc).apply(&products)), [5, 4, 3, 1, 2]);
        assert_eq!(ids(&sorted(SortKey::PriceDesc).apply(&products)), [2, 1, 3, 4, 5]);
        assert_eq!(ids(&sorted(SortKey::Newest).apply(&products)), [5, 4, 3, 2, 1]);
        assert_eq!(ids(&sorted(SortKey::Name).apply(&products)), [3, 2, 5, 1, 4]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::parse_lenient("price-desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::parse_lenient("rating"), SortKey::Featured);
        assert_eq!(SortKey::parse_lenient(""), SortKey::Featured);
        for (key, _) in SortKey::OPTIONS {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
    }
}
