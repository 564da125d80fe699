//! Session Errors

use salvo::http::StatusError;
use tracing::warn;

use appointime_app::sessions::SessionsServiceError;

pub(crate) fn into_status_error(error: SessionsServiceError) -> StatusError {
    warn!("session rejected: {error}");

    match error {
        SessionsServiceError::NotFound => StatusError::unauthorized().brief("Unknown session"),
        SessionsServiceError::InvalidToken => {
            StatusError::unauthorized().brief("Invalid form token")
        }
        SessionsServiceError::Expired => StatusError::unauthorized().brief("Form token expired"),
    }
}
