//! Monthly offer rotation
//!
//! The featured offers are a pure function of the catalog order, the requested
//! count and the UTC (year, month) of the reference date, so every request in
//! the same month sees the same set.

use std::collections::HashSet;
use std::hash::Hash;

use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

use super::mulberry32::Mulberry32;

pub const DEFAULT_OFFER_COUNT: usize = 5;

/// Record shape the selector needs: an identity and a flag it may overwrite.
pub trait Offerable: Clone {
    type Id: Eq + Hash + Clone;

    /// `None` means the record can be shuffled but never selected.
    fn offer_id(&self) -> Option<Self::Id>;
    fn set_on_sale(&mut self, on_sale: bool);
}

/// `year * 100 + month` over UTC calendar fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectionSeed(i64);

impl SelectionSeed {
    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self(i64::from(date.year()) * 100 + i64::from(date.month()))
    }
    pub fn value(&self) -> i64 { self.0 }
    pub fn rng(&self) -> Mulberry32 { Mulberry32::from_i64(self.0) }
}

/// Ids chosen for one seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferSet<I: Eq + Hash> {
    seed: SelectionSeed,
    ids: HashSet<I>,
}

impl<I: Eq + Hash + Clone> OfferSet<I> {
    pub fn for_month<P>(products: &[P], count: usize, reference: DateTime<Utc>) -> Self
    where
        P: Offerable<Id = I>,
    {
        let seed = SelectionSeed::from_date(reference);
        let mut rng = seed.rng();
        // Shuffle positions rather than records; the permutation is the same.
        let mut order: Vec<usize> = (0..products.len()).collect();
        for i in (1..order.len()).rev() {
            let j = rng.next_index(i + 1);
            order.swap(i, j);
        }
        let ids = order
            .iter()
            .take(count.min(products.len()))
            .filter_map(|&idx| products[idx].offer_id())
            .collect();
        Self { seed, ids }
    }

    pub fn seed(&self) -> SelectionSeed { self.seed }
    pub fn contains(&self, id: &I) -> bool { self.ids.contains(id) }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn ids(&self) -> impl Iterator<Item = &I> { self.ids.iter() }

    /// Fresh copy of `products`, in the same order, with `on_sale` set iff selected.
    pub fn annotate<P>(&self, products: &[P]) -> Vec<P>
    where
        P: Offerable<Id = I>,
    {
        products
            .iter()
            .map(|p| {
                let mut copy = p.clone();
                let on_sale = p.offer_id().is_some_and(|id| self.contains(&id));
                copy.set_on_sale(on_sale);
                copy
            })
            .collect()
    }
}

/// Marks a month-stable subset of `products` as on sale.
///
/// Any `on_sale` value already present on the input is replaced. Empty input
/// comes back empty; a `count` of zero clears every flag.
pub fn select_monthly_offers<P: Offerable>(products: &[P], count: usize, reference: DateTime<Utc>) -> Vec<P> {
    if products.is_empty() { return Vec::new(); }
    let offers = OfferSet::for_month(products, count, reference);
    tracing::debug!(seed = offers.seed().value(), selected = offers.len(), total = products.len(), "selected monthly offers");
    offers.annotate(products)
}

/// Untyped variant for catalogs held as raw JSON.
///
/// Anything that is not a non-empty array is returned untouched, and a
/// non-positive `count` selects nothing.
pub fn select_monthly_offers_json(products: Value, count: i64, reference: DateTime<Utc>) -> Value {
    match products {
        Value::Array(items) if !items.is_empty() => {
            let count = usize::try_from(count).unwrap_or(0);
            Value::Array(select_monthly_offers(&items, count, reference))
        }
        other => other,
    }
}

impl Offerable for Value {
    type Id = String;

    // Numeric ids compare by value (1 and 1.0 match); strings stay quoted, so 1 and "1" differ.
    fn offer_id(&self) -> Option<String> {
        match self.get("id")? {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(|f| f.to_string()),
            other => Some(other.to_string()),
        }
    }

    fn set_on_sale(&mut self, on_sale: bool) {
        if let Value::Object(map) = self {
            map.insert("onSale".to_string(), Value::Bool(on_sale));
        }
    }
}
