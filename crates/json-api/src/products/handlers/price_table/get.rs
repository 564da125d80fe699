//! Get Price Table Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use appointime::products::ProductId;

use crate::{
    extensions::*,
    products::{errors::into_status_error, price_table::PriceTableResponse},
    state::State,
};

/// Get Price Table Handler
#[endpoint(
    tags("admin"),
    summary = "Get Price Table",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price table"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid admin token"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Product is not an appointment"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<u64>,
    depot: &mut Depot,
) -> Result<Json<PriceTableResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = ProductId::new(product.into_inner());

    let table = state
        .app
        .products
        .get_price_table(product)
        .await
        .map_err(into_status_error)?;

    Ok(Json(PriceTableResponse::new(product, &table)))
}
