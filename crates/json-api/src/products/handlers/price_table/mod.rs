//! Price Table Handlers
//!
//! Admin routes; mounted behind the admin bearer middleware.

use std::collections::BTreeMap;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use appointime::{money::format_amount, products::ProductId, table::DurationPriceTable};

pub(crate) mod get;
pub(crate) mod update;

/// Price Table Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceTableResponse {
    /// Product id
    pub product: u64,

    /// Price of the fixed 30 minute unit
    pub base_price: String,

    /// Reference rate for free-form extra time
    pub hourly_rate: Option<String>,

    /// Bucket key to package price. Unpriced buckets are absent.
    pub prices: BTreeMap<String, String>,
}

impl PriceTableResponse {
    pub(crate) fn new(product: ProductId, table: &DurationPriceTable) -> Self {
        Self {
            product: product.get(),
            base_price: format_amount(table.base_price()),
            hourly_rate: table.hourly_rate().map(format_amount),
            prices: table
                .iter()
                .map(|(bucket, price)| (bucket.key().to_string(), format_amount(price)))
                .collect(),
        }
    }
}
