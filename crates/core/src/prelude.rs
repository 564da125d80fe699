//! Appointime prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, CartTotals, LineKey},
    catalog::{Catalog, CatalogError},
    durations::{
        BASE_MINUTES, DurationBucket, DurationError, FreeFormDuration, MAX_ADDITIONAL_MINUTES,
        TimeUnit, format_minutes,
    },
    money::{AmountError, MAX_AMOUNT, format_amount, parse_non_negative, round_to_minor},
    products::{Product, ProductId, ProductKind},
    storefront::{LineQuote, PresetOption, line_item_data, preset_options},
    surcharge::{
        SurchargeError, SurchargeSelection, SurchargeSource, apply_duration, apply_free_form,
        apply_preset, parse_free_form, recompute_cart_total, reset, toggle_no_customization,
    },
    table::{DurationPriceTable, PriceTableError},
};
