//! Apply Surcharge Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use appointime::{cart::LineKey, money::format_amount};
use appointime_app::domain::carts::{
    CartsServiceError,
    data::{DurationRequest, SurchargeOutcome, SurchargeRequest},
};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Apply Surcharge Request
///
/// Exactly one duration is used: `preset` wins over `additional_hours`,
/// which wins over `additional_minutes`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplySurchargeRequest {
    /// Key of the appointment line
    pub line_key: String,

    /// Preset bucket key, e.g. `2h`
    #[serde(default)]
    pub preset: Option<String>,

    /// Free-form extra hours, e.g. `1.5`
    #[serde(default)]
    pub additional_hours: Option<String>,

    /// Free-form extra minutes, e.g. `90`
    #[serde(default)]
    pub additional_minutes: Option<String>,

    /// Cost the client displayed; recomputed server-side
    #[serde(default)]
    pub additional_cost: Option<String>,
}

impl TryFrom<ApplySurchargeRequest> for SurchargeRequest {
    type Error = CartsServiceError;

    fn try_from(request: ApplySurchargeRequest) -> Result<Self, Self::Error> {
        let duration = DurationRequest::from_fields(
            request.preset.as_deref(),
            request.additional_hours.as_deref(),
            request.additional_minutes.as_deref(),
        )?;

        Ok(SurchargeRequest {
            line_key: LineKey::from(request.line_key),
            duration,
            quoted_cost: request.additional_cost,
        })
    }
}

/// Surcharge Applied Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SurchargeAppliedResponse {
    pub additional_minutes: u32,
    pub additional_cost: String,
    pub updated_total: String,
}

impl From<SurchargeOutcome> for SurchargeAppliedResponse {
    fn from(outcome: SurchargeOutcome) -> Self {
        Self {
            additional_minutes: outcome.additional_minutes,
            additional_cost: format_amount(outcome.additional_cost),
            updated_total: format_amount(outcome.updated_total),
        }
    }
}

/// Apply Surcharge Handler
///
/// Books extra time on an appointment line and returns the recomputed cost
/// and cart total.
#[endpoint(
    tags("carts"),
    summary = "Apply Duration Surcharge",
    responses(
        (status_code = StatusCode::OK, description = "Surcharge applied"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid form token"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or unavailable duration"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.surcharge.apply",
    skip(json, depot),
    fields(session = tracing::field::Empty, line_key = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<ApplySurchargeRequest>,
    depot: &mut Depot,
) -> Result<Json<SurchargeAppliedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let token = depot.form_token_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("session", tracing::field::display(session));
    span.record("line_key", request.line_key.as_str());

    let request = SurchargeRequest::try_from(request).map_err(into_status_error)?;

    let outcome = state
        .app
        .carts
        .apply_surcharge(session, token, request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
