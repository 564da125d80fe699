//! Session Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::FormTokenSecret;

/// Session UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionUuid(Uuid);

impl SessionUuid {
    /// Generates a new time-ordered session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for SessionUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionUuid {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(value).map(Self)
    }
}

/// Session Record
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Secret half of the session's form token.
    pub secret: FormTokenSecret,

    /// When the form token was issued.
    pub issued_at: Timestamp,
}

/// A freshly started session, with the form token the client must echo back
/// on every cart mutation.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: SessionUuid,
    pub form_token: String,
    pub expires_at: Timestamp,
}
