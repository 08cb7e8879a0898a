use derive_more::{Display, Into};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Key prefix for session records in the store.
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Opaque session token (UUID v4, hyphenated lowercase).
///
/// Carries no structure or meaning; it is only a lookup key. Safe to place in
/// URLs and cookie values as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Into)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh token from 122 bits of CSPRNG output.
    #[must_use]
    pub fn generate() -> Self {
        let random_bytes: [u8; 16] = rand::rng().random();
        let uuid = uuid::Builder::from_random_bytes(random_bytes).into_uuid();
        Self(uuid.hyphenated().to_string())
    }

    /// Wraps a token value received from a client. No format check is made:
    /// an unknown value simply fails the store lookup.
    #[must_use]
    pub fn from_client(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store key of the record this token points at.
    #[must_use]
    pub fn record_key(&self) -> String {
        format!("{SESSION_KEY_PREFIX}{}", self.0)
    }
}

/// Identity bound to a session (a normalized email address).
///
/// Built by [`Identity::normalize`] at issuance, or taken verbatim from the
/// store at validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Into)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Trims surrounding whitespace and lowercases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if nothing is left after trimming.
    pub fn normalize(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::MalformedInput("identity must not be empty".into()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Wraps a value read back from the store without touching it.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
