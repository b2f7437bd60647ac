//! Pharmacy Storefront
//!
//! Catalog, cart pricing and a month-stable featured-offers rotation for an
//! online pharmacy.
//!
//! ## Features
//! - Deterministic monthly offers (mulberry32 seeded shuffle)
//! - Catalog loading with a built-in fallback catalog
//! - Category and free-text product filtering
//! - Cart pricing with membership discounts and free-shipping threshold
//! - JSON HTTP API

pub mod catalog;
pub mod config;
pub mod domain;
pub mod http;
pub mod offers;

use thiserror::Error;

use crate::domain::aggregates::{CartError, ProductId};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
