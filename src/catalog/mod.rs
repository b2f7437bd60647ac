//! Catalog loading and the shopper-facing storefront view.
//!
//! Every load reads the raw catalog, falls back to the built-in products when
//! the store is empty or unreachable, then applies the monthly offer selection
//! for the caller-supplied instant.

mod fallback;
mod filter;

pub use fallback::fallback_catalog;
pub use filter::{categories, CategoryFilter, ProductFilter, ProductQuery, ALL_CATEGORIES};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::domain::aggregates::{Cart, CartTotals, Product, ProductId, Shopper};
use crate::offers::{select_monthly_offers, DEFAULT_OFFER_COUNT};
use crate::{StorefrontError, Result};

const PRODUCTS_QUERY: &str = "SELECT id::BIGINT AS id, name, description, price::NUMERIC AS price, \
     original_price::NUMERIC AS original_price, category, COALESCE(stock, 0)::INT4 AS stock, \
     COALESCE(on_sale, FALSE) AS on_sale, COALESCE(prescription, FALSE) AS prescription, sku, brand \
     FROM products ORDER BY name";

/// Where raw product records come from.
#[derive(Clone, Debug)]
pub enum CatalogSource {
    Database(PgPool),
    InMemory(Arc<Vec<Product>>),
    /// No store configured; always serves [`fallback_catalog`].
    Fallback,
}

impl CatalogSource {
    pub fn in_memory(products: Vec<Product>) -> Self { Self::InMemory(Arc::new(products)) }

    pub fn describe(&self) -> &'static str {
        match self { Self::Database(_) => "database", Self::InMemory(_) => "in-memory", Self::Fallback => "fallback" }
    }

    /// Raw records in store order. An empty result is not an error.
    pub async fn fetch(&self) -> Result<Vec<Product>> {
        match self {
            Self::Database(pool) => Ok(sqlx::query_as::<_, Product>(PRODUCTS_QUERY).fetch_all(pool).await?),
            Self::InMemory(products) => Ok(products.as_ref().clone()),
            Self::Fallback => Ok(Vec::new()),
        }
    }
}

/// One requested cart line.
#[derive(Clone, Debug, Deserialize, validator::Validate)]
pub struct QuoteLine {
    pub product_id: ProductId,
    #[validate(range(min = 1, max = 999))]
    pub quantity: u32,
}

#[derive(Clone, Debug)]
pub struct Storefront {
    source: CatalogSource,
    offer_count: usize,
}

impl Storefront {
    pub fn new(source: CatalogSource) -> Self { Self { source, offer_count: DEFAULT_OFFER_COUNT } }
    pub fn with_offer_count(mut self, count: usize) -> Self { self.offer_count = count; self }
    pub fn source(&self) -> &CatalogSource { &self.source }
    pub fn offer_count(&self) -> usize { self.offer_count }

    /// Full catalog with this month's offers flagged. A store failure is logged
    /// and served like an empty store.
    pub async fn products(&self, now: DateTime<Utc>) -> Result<Vec<Product>> {
        let raw = match self.source.fetch().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(source = self.source.describe(), error = %e, "failed to load catalog");
                Vec::new()
            }
        };
        let raw = if raw.is_empty() {
            if !matches!(self.source, CatalogSource::Fallback) {
                tracing::warn!(source = self.source.describe(), "catalog is empty, serving fallback products");
            }
            fallback_catalog()
        } else {
            raw
        };
        Ok(select_monthly_offers(&raw, self.offer_count, now))
    }

    pub async fn search(&self, filter: &ProductFilter, now: DateTime<Utc>) -> Result<Vec<Product>> {
        Ok(filter.apply(self.products(now).await?))
    }

    pub async fn offers(&self, now: DateTime<Utc>) -> Result<Vec<Product>> {
        self.search(&ProductFilter::offers(), now).await
    }

    pub async fn product(&self, id: ProductId, now: DateTime<Utc>) -> Result<Product> {
        self.products(now).await?.into_iter().find(|p| p.id == id).ok_or(StorefrontError::ProductNotFound(id))
    }

    pub async fn categories(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(categories(&self.products(now).await?))
    }

    /// Prices a cart built from `lines` against the current catalog.
    pub async fn quote(&self, lines: &[QuoteLine], shopper: &Shopper, now: DateTime<Utc>) -> Result<(Cart, CartTotals)> {
        let catalog = self.products(now).await?;
        let mut cart = Cart::default();
        for line in lines {
            let product = catalog.iter().find(|p| p.id == line.product_id).ok_or(StorefrontError::ProductNotFound(line.product_id))?;
            cart.add_product(product, line.quantity, shopper)?;
        }
        let totals = cart.totals(shopper);
        Ok((cart, totals))
    }
}
