use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::cookies::{self, SESSION_COOKIE_NAME};
use crate::error::Error;
use crate::store::{self, KeyValueStore};
use crate::types::{Identity, SessionToken};

/// Outcome of validating a request's cookies.
///
/// `NoSession` and `InvalidOrExpired` are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The token maps to this identity.
    Valid(Identity),
    /// No `session` cookie was sent.
    NoSession,
    /// The token is unknown. Forged and expired tokens are indistinguishable.
    InvalidOrExpired,
}

impl Validation {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::NoSession | Self::InvalidOrExpired => None,
        }
    }

    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Self::Valid(identity) => Some(identity),
            Self::NoSession | Self::InvalidOrExpired => None,
        }
    }
}

/// Resolves `Cookie` headers to identities. Read-only.
pub struct SessionValidator<S> {
    store: Arc<S>,
    store_timeout: Duration,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for SessionValidator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            store_timeout: self.store_timeout,
        }
    }
}

impl<S: KeyValueStore> SessionValidator<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &SessionConfig) -> Self {
        Self {
            store,
            store_timeout: config.store_timeout(),
        }
    }

    /// Validate a raw `Cookie` header value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreRead`] if the lookup fails or times out.
    pub async fn validate(&self, cookie_header: &str) -> Result<Validation, Error> {
        match cookies::cookie_value(cookie_header, SESSION_COOKIE_NAME) {
            Some(token) if !token.is_empty() => {
                self.validate_token(&SessionToken::from_client(token)).await
            }
            _ => {
                tracing::debug!("No session cookie");
                Ok(Validation::NoSession)
            }
        }
    }

    /// Look up a token that has already been pulled out of a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreRead`] if the lookup fails or times out.
    pub async fn validate_token(&self, token: &SessionToken) -> Result<Validation, Error> {
        let stored = store::with_timeout(self.store_timeout, self.store.get(&token.record_key()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session lookup failed");
                Error::StoreRead(e)
            })?;

        match stored {
            Some(identity) if !identity.is_empty() => {
                Ok(Validation::Valid(Identity::from_stored(identity)))
            }
            _ => {
                tracing::debug!("Unknown session token");
                Ok(Validation::InvalidOrExpired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::SessionIssuer;
    use crate::issuer::tests::{DownStore, StalledStore, test_config};
    use crate::store::MemoryStore;

    fn pair() -> (Arc<MemoryStore>, SessionIssuer<MemoryStore>, SessionValidator<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = test_config();
        let issuer = SessionIssuer::new(store.clone(), &config);
        let validator = SessionValidator::new(store.clone(), &config);
        (store, issuer, validator)
    }

    #[tokio::test]
    async fn issued_session_validates_to_normalized_identity() {
        let (store, issuer, validator) = pair();

        let issued = issuer.issue("User@Example.COM").await.unwrap();
        assert_eq!(
            store.get(&format!("session:{}", issued.token)).await.unwrap().as_deref(),
            Some("user@example.com")
        );

        let header = format!("session={}", issued.token);
        let outcome = validator.validate(&header).await.unwrap();
        assert_eq!(
            outcome.identity().map(Identity::as_str),
            Some("user@example.com")
        );
    }

    #[tokio::test]
    async fn validates_alongside_other_cookies() {
        let (_, issuer, validator) = pair();
        let issued = issuer.issue("a@b.com").await.unwrap();

        let header = format!("theme=dark; other=x=y; session={} ; lang=en", issued.token);
        let outcome = validator.validate(&header).await.unwrap();
        assert_eq!(outcome.into_identity(), Some(issued.identity));
    }

    #[tokio::test]
    async fn token_is_taken_whole_after_first_equals() {
        let (store, _, validator) = pair();
        store.set("session:abc123", "x@y.z").await.unwrap();
        store.set("session:abc=123", "wrong@y.z").await.unwrap();

        let outcome = validator.validate("other=x=y; session=abc123").await.unwrap();
        assert_eq!(outcome.identity().map(Identity::as_str), Some("x@y.z"));

        let outcome = validator.validate("session=abc=123").await.unwrap();
        assert_eq!(outcome.identity().map(Identity::as_str), Some("wrong@y.z"));
    }

    #[tokio::test]
    async fn stored_identity_is_returned_verbatim() {
        let (store, _, validator) = pair();
        store.set("session:t1", "Mixed@Case.Example").await.unwrap();

        let outcome = validator.validate("session=t1").await.unwrap();
        assert_eq!(
            outcome.identity().map(Identity::as_str),
            Some("Mixed@Case.Example")
        );
    }

    #[tokio::test]
    async fn unknown_token_is_invalid_or_expired() {
        let (_, _, validator) = pair();
        let outcome = validator
            .validate("session=00000000-0000-4000-8000-000000000000")
            .await
            .unwrap();
        assert_eq!(outcome, Validation::InvalidOrExpired);
    }

    #[tokio::test]
    async fn empty_stored_value_is_invalid_or_expired() {
        let (store, _, validator) = pair();
        store.set("session:blank", "").await.unwrap();
        let outcome = validator.validate("session=blank").await.unwrap();
        assert_eq!(outcome, Validation::InvalidOrExpired);
    }

    #[tokio::test]
    async fn missing_session_cookie_is_no_session() {
        let (_, _, validator) = pair();
        assert_eq!(validator.validate("").await.unwrap(), Validation::NoSession);
        assert_eq!(
            validator.validate("theme=dark; sessionid=abc").await.unwrap(),
            Validation::NoSession
        );
        assert_eq!(validator.validate("session").await.unwrap(), Validation::NoSession);
        assert_eq!(validator.validate("session=").await.unwrap(), Validation::NoSession);
    }

    #[tokio::test]
    async fn no_session_skips_store() {
        let validator = SessionValidator::new(Arc::new(DownStore), &test_config());
        assert_eq!(validator.validate("a=b").await.unwrap(), Validation::NoSession);
    }

    #[tokio::test]
    async fn store_failure_is_read_error_not_not_found() {
        let validator = SessionValidator::new(Arc::new(DownStore), &test_config());
        let err = validator.validate("session=abc").await.unwrap_err();
        assert!(matches!(err, Error::StoreRead(_)));
    }

    #[tokio::test]
    async fn stalled_store_times_out() {
        let validator = SessionValidator::new(Arc::new(StalledStore), &test_config());
        let err = validator.validate("session=abc").await.unwrap_err();
        assert!(matches!(err, Error::StoreRead(_)));
    }

    #[tokio::test]
    async fn failed_issue_leaves_nothing_to_validate() {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let issuer = SessionIssuer::new(Arc::new(DownStore), &config);
        let validator = SessionValidator::new(store.clone(), &config);

        assert!(issuer.issue("a@b.com").await.is_err());
        assert!(store.is_empty().await);

        // A token that was generated but never persisted.
        let never_issued = SessionToken::generate();
        let outcome = validator
            .validate(&format!("session={never_issued}"))
            .await
            .unwrap();
        assert_eq!(outcome, Validation::InvalidOrExpired);
    }

    #[tokio::test]
    async fn validation_does_not_mutate_store() {
        let (store, issuer, validator) = pair();
        issuer.issue("a@b.com").await.unwrap();
        validator.validate("session=unknown").await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
