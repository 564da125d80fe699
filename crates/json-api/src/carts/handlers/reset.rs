//! Reset Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use appointime::cart::LineKey;

use crate::{
    carts::{
        errors::into_status_error,
        handlers::{LineKeyRequest, UpdatedTotalResponse},
    },
    extensions::*,
    state::State,
};

/// Reset Line Handler
///
/// Clears any extra time booked on a line. Resetting an untouched line is a
/// no-op that still returns the cart total.
#[endpoint(
    tags("carts"),
    summary = "Reset Duration Surcharge",
    responses(
        (status_code = StatusCode::OK, description = "Line reset"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid form token"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LineKeyRequest>,
    depot: &mut Depot,
) -> Result<Json<UpdatedTotalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let token = depot.form_token_or_401()?;
    let line_key = LineKey::from(json.into_inner().line_key);

    let updated_total = state
        .app
        .carts
        .reset_line(session, token, &line_key)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated_total.into()))
}
