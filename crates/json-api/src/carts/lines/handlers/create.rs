//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use appointime::products::ProductId;
use appointime_app::domain::carts::data::NewCartLine;

use crate::{
    carts::{errors::into_status_error, get::CartLineResponse},
    extensions::*,
    state::State,
};

fn default_quantity() -> u32 {
    1
}

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartLineRequest {
    /// Product id
    pub product: u64,

    /// Quantity; appointments are always booked once
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl From<AddCartLineRequest> for NewCartLine {
    fn from(request: AddCartLineRequest) -> Self {
        NewCartLine {
            product: ProductId::new(request.product),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Line Handler
#[endpoint(
    tags("carts"),
    summary = "Add Cart Line",
    responses(
        (status_code = StatusCode::CREATED, description = "Line added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart total out of range"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid form token"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let token = depot.form_token_or_401()?;

    let line = state
        .app
        .carts
        .add_line(session, token, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/cart/lines/{}", line.key()), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    let line =
        CartLineResponse::try_from(&line).map_err(|source| into_status_error(source.into()))?;

    Ok(Json(line))
}
