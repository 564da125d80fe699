//! No Customization Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use appointime::cart::LineKey;

use crate::{
    carts::{errors::into_status_error, handlers::UpdatedTotalResponse},
    extensions::*,
    state::State,
};

/// No Customization Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NoCustomizationRequest {
    /// Key of the appointment line
    pub line_key: String,

    /// `true` keeps the booked extra time but stops charging for it
    pub enabled: bool,
}

/// No Customization Handler
///
/// Mutes or restores the extra time booked on a line.
#[endpoint(
    tags("carts"),
    summary = "Toggle No Customization",
    responses(
        (status_code = StatusCode::OK, description = "Line updated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid form token"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart line is not an appointment"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<NoCustomizationRequest>,
    depot: &mut Depot,
) -> Result<Json<UpdatedTotalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let token = depot.form_token_or_401()?;
    let request = json.into_inner();

    let updated_total = state
        .app
        .carts
        .toggle_no_customization(
            session,
            token,
            &LineKey::from(request.line_key),
            request.enabled,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated_total.into()))
}
