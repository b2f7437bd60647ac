//! Storefront filtering by category and free-text search.

use serde::Deserialize;

use crate::domain::aggregates::Product;

pub const ALL_CATEGORIES: &str = "all";
const OFFERS_ALIASES: [&str; 2] = ["ofertas", "offers"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Only products currently on sale.
    Offers,
    Named(String),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => Self::All,
            Some(c) if OFFERS_ALIASES.iter().any(|a| c.eq_ignore_ascii_case(a)) => Self::Offers,
            Some(c) => Self::Named(c.to_string()),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Offers => product.on_sale,
            Self::Named(name) => product.category.as_deref() == Some(name.as_str()),
        }
    }
}

/// Query string accepted by the product listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: CategoryFilter,
    search: Option<String>,
}

impl ProductFilter {
    pub fn new(category: CategoryFilter, search: Option<&str>) -> Self {
        let search = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Self { category, search }
    }

    pub fn offers() -> Self { Self::new(CategoryFilter::Offers, None) }

    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(product) && self.search.as_deref().map_or(true, |needle| {
            product.searchable_fields().any(|field| field.to_lowercase().contains(needle))
        })
    }

    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

impl From<&ProductQuery> for ProductFilter {
    fn from(q: &ProductQuery) -> Self { Self::new(CategoryFilter::parse(q.category.as_deref()), q.search.as_deref()) }
}

/// `"all"` followed by each distinct category in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for category in products.iter().filter_map(|p| p.category.as_deref()).filter(|c| !c.is_empty()) {
        if !out.iter().any(|c| c == category) { out.push(category.to_string()); }
    }
    out
}
