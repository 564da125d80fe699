//! Product Presets Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use appointime::{
    money::format_amount,
    products::ProductId,
    storefront::{PresetOption, preset_options},
};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Preset Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PresetResponse {
    /// Bucket key to send back as `preset`, e.g. `2h`
    pub preset: String,

    /// Button label, e.g. `24h(max)`
    pub label: String,

    /// Package price
    pub price: String,
}

impl From<PresetOption> for PresetResponse {
    fn from(option: PresetOption) -> Self {
        Self {
            preset: option.bucket.key().to_string(),
            label: option.label.to_string(),
            price: format_amount(option.price),
        }
    }
}

/// Presets Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PresetsResponse {
    /// Product id
    pub product: u64,

    /// Price of the standard 30 minute package
    pub base_price: String,

    /// Price of one hour of free-form extra time, when configured
    pub hourly_rate: Option<String>,

    /// Priced presets in storefront order
    pub presets: Vec<PresetResponse>,
}

/// Product Presets Handler
///
/// Returns the duration preset buttons of an appointment product. Buckets
/// without a price are left out.
#[endpoint(
    tags("products"),
    summary = "List Duration Presets",
    responses(
        (status_code = StatusCode::OK, description = "Preset buttons"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Product is not an appointment"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<u64>,
    depot: &mut Depot,
) -> Result<Json<PresetsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = ProductId::new(product.into_inner());

    let table = state
        .app
        .products
        .get_price_table(product)
        .await
        .map_err(into_status_error)?;

    Ok(Json(PresetsResponse {
        product: product.get(),
        base_price: format_amount(table.base_price()),
        hourly_rate: table.hourly_rate().map(format_amount),
        presets: preset_options(&table).into_iter().map(Into::into).collect(),
    }))
}
