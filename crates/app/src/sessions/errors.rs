//! Sessions service errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionsServiceError {
    #[error("session not found")]
    NotFound,

    #[error("form token is invalid")]
    InvalidToken,

    #[error("form token has expired")]
    Expired,
}
