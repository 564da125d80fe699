//! Sessions service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::sessions::{
    errors::SessionsServiceError,
    records::{IssuedSession, SessionRecord, SessionUuid},
    token::{format_form_token, generate_form_token_secret, parse_form_token},
};

/// Default form token lifetime, in seconds.
pub const DEFAULT_FORM_TOKEN_TTL_SECS: u64 = 86_400;

#[derive(Debug)]
pub struct MemorySessionsService {
    sessions: RwLock<FxHashMap<SessionUuid, SessionRecord>>,
    ttl: SignedDuration,
}

impl MemorySessionsService {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            ttl: SignedDuration::from_secs(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    fn expires_at(&self, issued_at: Timestamp) -> Timestamp {
        issued_at.checked_add(self.ttl).unwrap_or(Timestamp::MAX)
    }

    /// Starts a session as of `now`.
    pub async fn start_session_at(&self, now: Timestamp) -> IssuedSession {
        let session = SessionUuid::new();
        let secret = generate_form_token_secret();
        let form_token = format_form_token(session, &secret);

        self.sessions.write().await.insert(
            session,
            SessionRecord {
                secret,
                issued_at: now,
            },
        );

        info!(session = %session, "started session");

        IssuedSession {
            session,
            form_token,
            expires_at: self.expires_at(now),
        }
    }

    /// Checks a form token against a session as of `now`. An expired session
    /// is removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionsServiceError::InvalidToken`] when the token is
    /// malformed, belongs to another session or carries the wrong secret,
    /// [`SessionsServiceError::NotFound`] for unknown sessions and
    /// [`SessionsServiceError::Expired`] once the token's lifetime has passed.
    pub async fn verify_form_token_at(
        &self,
        session: SessionUuid,
        token: &str,
        now: Timestamp,
    ) -> Result<(), SessionsServiceError> {
        let parsed = parse_form_token(token).map_err(|_| SessionsServiceError::InvalidToken)?;

        if parsed.session != session {
            warn!(session = %session, "form token issued for another session");

            return Err(SessionsServiceError::InvalidToken);
        }

        let mut sessions = self.sessions.write().await;

        let record = sessions.get(&session).ok_or(SessionsServiceError::NotFound)?;

        if now > self.expires_at(record.issued_at) {
            sessions.remove(&session);

            info!(session = %session, "removed expired session");

            return Err(SessionsServiceError::Expired);
        }

        if !record.secret.matches(&parsed.secret) {
            warn!(session = %session, "form token secret mismatch");

            return Err(SessionsServiceError::InvalidToken);
        }

        Ok(())
    }

    /// Removes every session expired as of `now`, returning their ids.
    pub async fn purge_expired_at(&self, now: Timestamp) -> Vec<SessionUuid> {
        let mut sessions = self.sessions.write().await;

        let expired: Vec<_> = sessions
            .iter()
            .filter(|(_, record)| now > self.expires_at(record.issued_at))
            .map(|(session, _)| *session)
            .collect();

        for session in &expired {
            sessions.remove(session);
        }

        expired
    }
}

impl Default for MemorySessionsService {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_TOKEN_TTL_SECS)
    }
}

#[async_trait]
impl SessionsService for MemorySessionsService {
    async fn start_session(&self) -> Result<IssuedSession, SessionsServiceError> {
        Ok(self.start_session_at(Timestamp::now()).await)
    }

    async fn verify_form_token(
        &self,
        session: SessionUuid,
        token: &str,
    ) -> Result<(), SessionsServiceError> {
        self.verify_form_token_at(session, token, Timestamp::now())
            .await
    }

    async fn purge_expired(&self) -> Vec<SessionUuid> {
        self.purge_expired_at(Timestamp::now()).await
    }
}

#[automock]
#[async_trait]
pub trait SessionsService: Send + Sync {
    /// Starts a session and issues its form token.
    async fn start_session(&self) -> Result<IssuedSession, SessionsServiceError>;

    /// Checks that a form token is valid for the given session.
    async fn verify_form_token(
        &self,
        session: SessionUuid,
        token: &str,
    ) -> Result<(), SessionsServiceError>;

    /// Removes expired sessions, returning their ids.
    async fn purge_expired(&self) -> Vec<SessionUuid>;
}
