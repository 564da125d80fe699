//! Form token formatting, parsing, and comparison.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use super::records::SessionUuid;

/// Form token identifier prefix.
pub const FORM_TOKEN_PREFIX: &str = "ft";

/// Number of secret bytes encoded in a token.
pub const FORM_TOKEN_SECRET_BYTES: usize = 32;

const FORM_TOKEN_SECRET_HEX_CHARS: usize = FORM_TOKEN_SECRET_BYTES * 2;

#[derive(Clone)]
pub struct FormTokenSecret {
    bytes: [u8; FORM_TOKEN_SECRET_BYTES],
}

impl FormTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; FORM_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FORM_TOKEN_SECRET_BYTES] {
        &self.bytes
    }

    /// Compares two secrets without short-circuiting on the first difference.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

impl fmt::Debug for FormTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FormTokenSecret(**redacted**)")
    }
}

impl Drop for FormTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedFormToken {
    pub session: SessionUuid,
    pub secret: FormTokenSecret,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormTokenError {
    #[error("form token format is invalid")]
    InvalidFormat,

    #[error("form token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_form_token_secret() -> FormTokenSecret {
    let mut secret = [0_u8; FORM_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    FormTokenSecret::from_bytes(secret)
}

/// Formats a token as `ft_<session>.<hex secret>`.
#[must_use]
pub fn format_form_token(session: SessionUuid, secret: &FormTokenSecret) -> String {
    format!(
        "{FORM_TOKEN_PREFIX}_{}.{}",
        session.into_uuid().simple(),
        encode_secret_hex(secret.as_bytes())
    )
}

/// Splits a token into its session and secret.
///
/// # Errors
///
/// Returns an error when the prefix, session id or secret encoding is wrong.
pub fn parse_form_token(token: &str) -> Result<ParsedFormToken, FormTokenError> {
    let (prefix_and_id, secret_hex) = token
        .trim()
        .split_once('.')
        .ok_or(FormTokenError::InvalidFormat)?;

    let (prefix, session_segment) = prefix_and_id
        .split_once('_')
        .ok_or(FormTokenError::InvalidFormat)?;

    if prefix != FORM_TOKEN_PREFIX {
        return Err(FormTokenError::InvalidFormat);
    }

    let session = Uuid::try_parse(session_segment)
        .map(SessionUuid::from_uuid)
        .map_err(|_| FormTokenError::InvalidFormat)?;

    let secret = decode_secret_hex(secret_hex).ok_or(FormTokenError::InvalidSecretEncoding)?;

    Ok(ParsedFormToken {
        session,
        secret: FormTokenSecret::from_bytes(secret),
    })
}

fn encode_secret_hex(secret: &[u8; FORM_TOKEN_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(FORM_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; FORM_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != FORM_TOKEN_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; FORM_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let hi = decode_hex_nibble(*pair.first()?)?;
        let lo = decode_hex_nibble(*pair.last()?)?;

        *byte = (hi << 4) | lo;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_recovers_session_and_secret() -> TestResult {
        let session = SessionUuid::from_uuid(Uuid::nil());
        let secret = FormTokenSecret::from_bytes([0xAB; FORM_TOKEN_SECRET_BYTES]);

        let token = format_form_token(session, &secret);
        let parsed = parse_form_token(&token)?;

        assert!(token.starts_with("ft_00000000000000000000000000000000."));
        assert_eq!(parsed.session, session);
        assert!(parsed.secret.matches(&secret));

        Ok(())
    }

    #[test]
    fn parse_rejects_invalid_prefix() {
        let token = format!("xx_{}.{}", Uuid::nil().simple(), "ab".repeat(32));

        assert_eq!(
            parse_form_token(&token).map(|parsed| parsed.session),
            Err(FormTokenError::InvalidFormat)
        );
    }

    #[test]
    fn parse_rejects_short_or_non_hex_secrets() {
        let short = format!("ft_{}.abcd", Uuid::nil().simple());
        let non_hex = format!("ft_{}.{}", Uuid::nil().simple(), "zz".repeat(32));

        assert_eq!(
            parse_form_token(&short).map(|parsed| parsed.session),
            Err(FormTokenError::InvalidSecretEncoding)
        );
        assert_eq!(
            parse_form_token(&non_hex).map(|parsed| parsed.session),
            Err(FormTokenError::InvalidSecretEncoding)
        );
    }

    #[test]
    fn generated_secrets_differ() {
        let first = generate_form_token_secret();
        let second = generate_form_token_secret();

        assert!(!first.matches(&second), "two random secrets should not match");
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = FormTokenSecret::from_bytes([0x11; FORM_TOKEN_SECRET_BYTES]);

        assert_eq!(format!("{secret:?}"), "FormTokenSecret(**redacted**)");
    }
}
