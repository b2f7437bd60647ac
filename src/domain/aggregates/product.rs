//! Product Aggregate

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;
use crate::offers::Offerable;

pub type ProductId = i64;

/// One catalog record, as stored in the `products` table and served to shoppers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub prescription: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id, name: name.into(), description: None, price, original_price: None, category: None,
            stock: 0, on_sale: false, prescription: false, sku: None, brand: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self { self.description = Some(description.into()); self }
    pub fn with_category(mut self, category: impl Into<String>) -> Self { self.category = Some(category.into()); self }
    pub fn with_stock(mut self, stock: i32) -> Self { self.stock = stock; self }
    pub fn with_original_price(mut self, price: Decimal) -> Self { self.original_price = Some(price); self }
    pub fn requiring_prescription(mut self) -> Self { self.prescription = true; self }

    pub fn unit_price(&self) -> Money { Money::soles(self.price) }
    pub fn is_in_stock(&self) -> bool { self.stock > 0 }

    /// Whole-percent saving against `original_price`, when there is a real one.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|o| *o > self.price && !o.is_zero())?;
        ((original - self.price) / original * Decimal::ONE_HUNDRED).round().to_u32()
    }

    /// Text fields the storefront search looks at.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [Some(self.name.as_str()), self.description.as_deref(), self.category.as_deref(), self.sku.as_deref(), self.brand.as_deref()]
            .into_iter()
            .flatten()
    }
}

impl Offerable for Product {
    type Id = ProductId;
    fn offer_id(&self) -> Option<ProductId> { Some(self.id) }
    fn set_on_sale(&mut self, on_sale: bool) { self.on_sale = on_sale; }
}
