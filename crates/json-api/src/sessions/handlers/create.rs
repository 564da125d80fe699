//! Start Session Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointime_app::sessions::records::IssuedSession;

use crate::{extensions::*, sessions::errors::into_status_error, state::State};

/// Session Started Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionStartedResponse {
    /// Session id, sent back in the `X-Session` header
    pub session: Uuid,

    /// Anti-forgery token, sent back in the `X-Form-Token` header on every
    /// cart mutation
    pub form_token: String,

    /// When the form token stops being accepted
    pub expires_at: String,
}

impl From<IssuedSession> for SessionStartedResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            session: issued.session.into_uuid(),
            form_token: issued.form_token,
            expires_at: issued.expires_at.to_string(),
        }
    }
}

/// Start Session Handler
///
/// Starts a shopping session and issues its form token.
#[endpoint(
    tags("sessions"),
    summary = "Start Session",
    responses(
        (status_code = StatusCode::CREATED, description = "Session started"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionStartedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let issued = state
        .app
        .sessions
        .start_session()
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(issued.into()))
}
