//! Deterministic monthly offers
pub mod mulberry32;
pub mod monthly;

pub use mulberry32::Mulberry32;
pub use monthly::{select_monthly_offers, select_monthly_offers_json, OfferSet, Offerable, SelectionSeed, DEFAULT_OFFER_COUNT};
