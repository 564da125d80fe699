//! Storefront
//!
//! What the customer sees: preset buttons for a product, the per-line quote
//! panel, and the line metadata shown in the cart and at checkout.

use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    cart::CartLine,
    durations::{BASE_MINUTES, DurationBucket, format_minutes},
    money::{AmountError, format_amount},
    table::DurationPriceTable,
};

/// A preset button on the product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetOption {
    /// Bucket the button selects
    pub bucket: DurationBucket,

    /// Button label, e.g. `24h(max)`
    pub label: &'static str,

    /// Package price
    pub price: Decimal,
}

/// Preset buttons for a product, in storefront order. Buckets without a
/// price are left out.
pub fn preset_options(table: &DurationPriceTable) -> SmallVec<[PresetOption; 7]> {
    DurationBucket::STOREFRONT
        .into_iter()
        .filter_map(|bucket| {
            table.price_for(bucket).map(|price| PresetOption {
                bucket,
                label: bucket.storefront_label(),
                price,
            })
        })
        .collect()
}

/// The custom duration panel for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineQuote {
    /// Length of the whole session, e.g. `1 hour 30 minutes`
    pub session_duration: String,

    /// Price of the standard 30 minute package
    pub standard_package: Decimal,

    /// Extra time on top of the base, e.g. `1 hour`
    pub additional_time: String,

    /// What the extra time costs
    pub additional_cost: Decimal,

    /// Line total
    pub total: Decimal,
}

impl LineQuote {
    /// Quotes a line. Muted lines quote as the plain base appointment.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the line total does not fit.
    pub fn for_line(line: &CartLine) -> Result<Self, AmountError> {
        let selection = line.selection();

        let additional_minutes = if selection.is_active() {
            selection.additional_minutes()
        } else {
            0
        };

        let session_minutes = if line.has_package() {
            additional_minutes
        } else {
            BASE_MINUTES + additional_minutes
        };

        Ok(Self {
            session_duration: format_minutes(session_minutes),
            standard_package: line.base_price(),
            additional_time: format_minutes(additional_minutes),
            additional_cost: selection.effective_cost(),
            total: line.total()?,
        })
    }
}

/// Line metadata for the cart and checkout pages, as `(name, value)` pairs.
///
/// Rows appear only for positive values of an active selection.
pub fn line_item_data(line: &CartLine) -> Vec<(&'static str, String)> {
    let selection = line.selection();

    if !selection.is_active() {
        return Vec::new();
    }

    let mut data = Vec::with_capacity(2);

    if selection.additional_minutes() > 0 {
        data.push(("Additional Time", format_minutes(selection.additional_minutes())));
    }

    if selection.additional_cost() > Decimal::ZERO {
        data.push(("Additional Cost", format_amount(selection.additional_cost())));
    }

    data
}
