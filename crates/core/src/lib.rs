//! Appointime
//!
//! Appointime prices bookable, time-based services: a per-product table of
//! duration prices, an extra-time surcharge calculated per cart line, and the
//! cart totals that include it.

pub mod cart;
pub mod catalog;
pub mod durations;
pub mod money;
pub mod prelude;
pub mod products;
pub mod storefront;
pub mod surcharge;
pub mod table;
