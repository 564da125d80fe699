//! Cart Handlers

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use appointime::money::format_amount;

pub(crate) mod get;
pub(crate) mod no_customization;
pub(crate) mod reset;
pub(crate) mod surcharge;

/// Line Key Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineKeyRequest {
    /// Key of the cart line
    pub line_key: String,
}

/// Updated Total Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatedTotalResponse {
    /// Cart total after the change
    pub updated_total: String,
}

impl From<Decimal> for UpdatedTotalResponse {
    fn from(total: Decimal) -> Self {
        Self {
            updated_total: format_amount(total),
        }
    }
}
