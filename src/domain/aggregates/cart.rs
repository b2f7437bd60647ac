//! Cart Aggregate

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::product::{Product, ProductId};
use crate::domain::value_objects::{Money, Quantity, DEFAULT_CURRENCY};

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipLevel { Gold, Silver, Bronze }

impl MembershipLevel {
    pub fn discount_rate(&self) -> Decimal {
        match self { Self::Gold => Decimal::new(15, 2), Self::Silver | Self::Bronze => Decimal::new(10, 2) }
    }
}

/// Who is shopping. Authentication itself happens elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shopper {
    #[serde(default)]
    pub signed_in: bool,
    #[serde(default)]
    pub membership: Option<MembershipLevel>,
}

impl Shopper {
    pub fn guest() -> Self { Self::default() }
    pub fn member(level: MembershipLevel) -> Self { Self { signed_in: true, membership: Some(level) } }
    pub fn signed_in() -> Self { Self { signed_in: true, membership: None } }

    pub fn discount_rate(&self) -> Decimal {
        match (self.signed_in, self.membership) {
            (true, Some(level)) => level.discount_rate(),
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub on_sale: bool,
}

impl CartItem {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity.value()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: String,
}

impl Default for Cart { fn default() -> Self { Self::new(DEFAULT_CURRENCY) } }

impl Cart {
    pub fn new(currency: &str) -> Self { Self { items: vec![], currency: currency.to_string() } }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u32 { self.items.iter().map(|i| i.quantity.value()).sum() }

    pub fn add_product(&mut self, product: &Product, quantity: u32, shopper: &Shopper) -> Result<(), CartError> {
        if quantity == 0 { return Err(CartError::InvalidQuantity); }
        if product.prescription && !shopper.signed_in { return Err(CartError::PrescriptionRequiresLogin(product.id)); }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            existing.quantity = existing.quantity.add(quantity);
        } else {
            self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                quantity: Quantity::new(quantity),
                unit_price: Money::new(product.price, &self.currency),
                on_sale: product.on_sale,
            });
        }
        Ok(())
    }

    /// A quantity of zero or below drops the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 { return self.remove_item(product_id); }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound(product_id))?;
        item.quantity = Quantity::new(quantity);
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound(product_id)); }
        Ok(())
    }

    pub fn subtotal(&self, shopper: &Shopper) -> Money {
        let rate = shopper.discount_rate();
        self.items.iter().fold(Money::zero(&self.currency), |acc, i| {
            acc.add(&i.line_total().discounted(rate)).unwrap_or(acc)
        })
    }

    pub fn totals(&self, shopper: &Shopper) -> CartTotals {
        let subtotal = self.subtotal(shopper);
        let shipping = if self.is_empty() || subtotal.amount() > FREE_SHIPPING_THRESHOLD {
            Money::zero(&self.currency)
        } else {
            Money::new(FLAT_SHIPPING, &self.currency)
        };
        let total = subtotal.add(&shipping).unwrap_or_else(|_| subtotal.clone());
        CartTotals { item_count: self.item_count(), subtotal: subtotal.rounded(), shipping, total: total.rounded() }
    }

    /// Payment is not wired up; this only reports why a checkout cannot proceed.
    pub fn checkout(&self, shopper: &Shopper) -> Result<CartTotals, CartError> {
        if !shopper.signed_in { return Err(CartError::LoginRequired); }
        if self.is_empty() { return Err(CartError::Empty); }
        Err(CartError::CheckoutUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Item {0} not in cart")]
    ItemNotFound(ProductId),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Product {0} requires a prescription; sign in to buy it")]
    PrescriptionRequiresLogin(ProductId),
    #[error("Sign in to check out")]
    LoginRequired,
    #[error("Cart is empty")]
    Empty,
    #[error("Checkout is not implemented")]
    CheckoutUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitamin() -> Product { Product::new(4, "Vitamina C 1000mg", Decimal::new(3000, 2)) }
    fn wipes() -> Product { Product::new(11, "Toallitas", Decimal::new(1250, 2)) }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::default();
        let guest = Shopper::guest();
        cart.add_product(&vitamin(), 2, &guest).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal(&guest).amount(), Decimal::new(60, 0));
        cart.add_product(&vitamin(), 1, &guest).unwrap();
        assert_eq!(cart.items()[0].quantity.value(), 3); // Merged
        cart.add_product(&wipes(), 2, &guest).unwrap();
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_removes_non_positive() {
        let mut cart = Cart::default();
        cart.add_product(&vitamin(), 2, &Shopper::guest()).unwrap();
        cart.update_quantity(4, 7).unwrap();
        assert_eq!(cart.item_count(), 7);
        cart.update_quantity(4, -1).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.update_quantity(4, 3), Err(CartError::ItemNotFound(4)));
    }

    #[test]
    fn test_prescription_needs_sign_in() {
        let mut cart = Cart::default();
        let rx = Product::new(20, "Amoxicilina", Decimal::new(15, 0)).requiring_prescription();
        assert_eq!(cart.add_product(&rx, 1, &Shopper::guest()), Err(CartError::PrescriptionRequiresLogin(20)));
        cart.add_product(&rx, 1, &Shopper::signed_in()).unwrap();
        assert_eq!(cart.add_product(&rx, 0, &Shopper::signed_in()), Err(CartError::InvalidQuantity));
    }

    #[test]
    fn test_shipping_threshold() {
        let mut cart = Cart::default();
        let guest = Shopper::guest();
        assert!(cart.totals(&guest).shipping.is_zero());
        cart.add_product(&wipes(), 4, &guest).unwrap(); // exactly 50
        let totals = cart.totals(&guest);
        assert_eq!(totals.shipping.amount(), Decimal::TEN);
        assert_eq!(totals.total.amount(), Decimal::new(60, 0));
        cart.add_product(&wipes(), 1, &guest).unwrap();
        assert!(cart.totals(&guest).shipping.is_zero());
    }

    #[test]
    fn test_membership_discounts() {
        let mut cart = Cart::default();
        cart.add_product(&vitamin(), 2, &Shopper::guest()).unwrap();
        assert_eq!(cart.totals(&Shopper::member(MembershipLevel::Gold)).subtotal.amount(), Decimal::new(51, 0));
        let silver = cart.totals(&Shopper::member(MembershipLevel::Silver));
        assert_eq!(silver.subtotal.amount(), Decimal::new(54, 0));
        assert!(silver.shipping.is_zero());
        // Membership only counts once signed in.
        let lapsed = Shopper { signed_in: false, membership: Some(MembershipLevel::Gold) };
        assert_eq!(cart.subtotal(&lapsed).amount(), Decimal::new(60, 0));
        let plain = cart.totals(&Shopper::signed_in());
        assert_eq!(plain.subtotal.amount(), Decimal::new(60, 0));
        assert_eq!(plain.total.currency(), "PEN");
        let bronze = cart.totals(&Shopper::member(MembershipLevel::Bronze));
        assert_eq!(bronze.subtotal.amount(), Decimal::new(54, 0));
    }

    #[test]
    fn test_checkout_is_a_stub() {
        let mut cart = Cart::default();
        assert_eq!(cart.checkout(&Shopper::guest()), Err(CartError::LoginRequired));
        assert_eq!(cart.checkout(&Shopper::signed_in()), Err(CartError::Empty));
        cart.add_product(&wipes(), 1, &Shopper::guest()).unwrap();
        assert_eq!(cart.checkout(&Shopper::signed_in()), Err(CartError::CheckoutUnavailable));
    }
}
