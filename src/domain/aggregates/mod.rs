//! Aggregates module
pub mod product;
pub mod cart;

pub use product::{Product, ProductId};
pub use cart::{Cart, CartError, CartItem, CartTotals, MembershipLevel, Shopper};
