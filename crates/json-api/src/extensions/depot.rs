//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use appointime_app::sessions::records::SessionUuid;

const SESSION_DEPOT_KEY: &str = "session";
const FORM_TOKEN_DEPOT_KEY: &str = "form_token";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_session(&mut self, session: SessionUuid);

    fn session_or_401(&self) -> Result<SessionUuid, StatusError>;

    fn insert_form_token(&mut self, token: String);

    /// The form token sent with the request. Only mutations require one.
    fn form_token_or_401(&self) -> Result<&str, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_session(&mut self, session: SessionUuid) {
        self.insert(SESSION_DEPOT_KEY, session);
    }

    fn session_or_401(&self) -> Result<SessionUuid, StatusError> {
        self.get::<SessionUuid>(SESSION_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Missing session"))
    }

    fn insert_form_token(&mut self, token: String) {
        self.insert(FORM_TOKEN_DEPOT_KEY, token);
    }

    fn form_token_or_401(&self) -> Result<&str, StatusError> {
        self.get::<String>(FORM_TOKEN_DEPOT_KEY)
            .map(String::as_str)
            .map_err(|_ignored| StatusError::unauthorized().brief("Missing form token"))
    }
}
