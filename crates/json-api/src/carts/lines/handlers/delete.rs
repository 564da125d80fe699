//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use appointime::cart::LineKey;

use crate::{
    carts::{errors::into_status_error, handlers::UpdatedTotalResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Line Handler
///
/// Removes a line together with any extra time booked on it.
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Line",
    responses(
        (status_code = StatusCode::OK, description = "Line removed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid form token"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
    )
)]
pub(crate) async fn handler(
    line_key: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<UpdatedTotalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let token = depot.form_token_or_401()?;

    let updated_total = state
        .app
        .carts
        .remove_line(session, token, &LineKey::from(line_key.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated_total.into()))
}
