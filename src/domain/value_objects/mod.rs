//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CURRENCY: &str = "PEN";

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn soles(amount: Decimal) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_zero(&self) -> bool { self.amount.is_zero() }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }

    /// Price after taking `rate` (0.15 = 15 %) off.
    pub fn discounted(&self, rate: Decimal) -> Money { Money::new(self.amount * (Decimal::ONE - rate), &self.currency) }

    /// Rounded to cents, halves away from zero.
    pub fn rounded(&self) -> Money {
        Money::new(self.amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero), &self.currency)
    }
}

impl Default for Money { fn default() -> Self { Self::zero(DEFAULT_CURRENCY) } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {:.2}", self.currency, self.amount) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_money_add() {
        let a = Money::soles(Decimal::new(2550, 2));
        let b = Money::soles(Decimal::new(1875, 2));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(4425, 2));
        assert_eq!(a.add(&Money::new(Decimal::ONE, "USD")), Err(MoneyError::CurrencyMismatch));
    }
    #[test]
    fn test_money_discount_and_display() {
        let price = Money::soles(Decimal::new(3000, 2));
        assert_eq!(price.discounted(Decimal::new(15, 2)).amount(), Decimal::new(2550, 2));
        assert_eq!(Money::soles(Decimal::new(28901, 3)).rounded().to_string(), "PEN 28.90");
        assert_eq!(Money::soles(Decimal::new(10625, 3)).rounded().amount(), Decimal::new(1063, 2));
    }
    #[test]
    fn test_quantity_saturates() {
        assert_eq!(Quantity::new(u32::MAX).add(1).value(), u32::MAX);
        assert!(Quantity::default().is_zero());
    }
}
