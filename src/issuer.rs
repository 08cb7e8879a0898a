use std::sync::Arc;
use std::time::Duration;

use ::cookie::Cookie;

use crate::config::SessionConfig;
use crate::cookies;
use crate::error::Error;
use crate::store::{self, KeyValueStore};
use crate::types::{Identity, SessionToken};

/// A session that has been written to the store.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct IssuedSession {
    pub token: SessionToken,
    pub identity: Identity,
    /// Attach as a `Set-Cookie` response header.
    pub cookie: Cookie<'static>,
}

impl IssuedSession {
    /// Value for the `Set-Cookie` header.
    #[must_use]
    pub fn set_cookie_header(&self) -> String {
        cookies::set_cookie_header(&self.cookie)
    }
}

/// Creates session records and their cookies.
pub struct SessionIssuer<S> {
    store: Arc<S>,
    store_timeout: Duration,
    secure_cookies: bool,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for SessionIssuer<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            store_timeout: self.store_timeout,
            secure_cookies: self.secure_cookies,
        }
    }
}

impl<S: KeyValueStore> SessionIssuer<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &SessionConfig) -> Self {
        Self {
            store,
            store_timeout: config.store_timeout(),
            secure_cookies: config.secure_cookies(),
        }
    }

    /// Issue a session for an identity the caller has already established.
    ///
    /// The identity is normalized, a fresh token is generated, and
    /// `session:<token> -> identity` is written with no expiry. The cookie is
    /// only built once that write has succeeded.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedInput`] if `identity` is blank (no store access).
    /// - [`Error::StoreWrite`] if the write fails or times out.
    pub async fn issue(&self, identity: &str) -> Result<IssuedSession, Error> {
        let identity = Identity::normalize(identity)?;
        let token = SessionToken::generate();

        store::with_timeout(
            self.store_timeout,
            self.store.set(&token.record_key(), identity.as_str()),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Session write failed");
            Error::StoreWrite(e)
        })?;

        let cookie = cookies::session_cookie(&token, self.secure_cookies);

        tracing::info!("Session issued");

        Ok(IssuedSession {
            token,
            identity,
            cookie,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::BoxError;
    use crate::store::MemoryStore;

    /// Store whose every call fails.
    pub(crate) struct DownStore;

    impl KeyValueStore for DownStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, BoxError> {
            Err("connection refused".into())
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), BoxError> {
            Err("connection refused".into())
        }
    }

    /// Store that never answers.
    pub(crate) struct StalledStore;

    impl KeyValueStore for StalledStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, BoxError> {
            std::future::pending().await
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), BoxError> {
            std::future::pending().await
        }
    }

    pub(crate) fn test_config() -> SessionConfig {
        SessionConfig::new("redis://127.0.0.1:6379".parse().unwrap())
            .with_store_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn issue_stores_normalized_identity() {
        let store = Arc::new(MemoryStore::new());
        let issuer = SessionIssuer::new(store.clone(), &test_config());

        let issued = issuer.issue("User@Example.COM").await.unwrap();

        assert_eq!(issued.identity.as_str(), "user@example.com");
        let key = format!("session:{}", issued.token);
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("user@example.com"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn issue_normalization_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let issuer = SessionIssuer::new(store.clone(), &test_config());

        let a = issuer.issue("  A@B.com ").await.unwrap();
        let b = issuer.issue("a@b.com").await.unwrap();

        let stored_a = store.get(&a.token.record_key()).await.unwrap();
        let stored_b = store.get(&b.token.record_key()).await.unwrap();
        assert_eq!(stored_a, stored_b);
        assert_eq!(stored_a.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn issue_cookie_carries_token_and_attributes() {
        let issuer = SessionIssuer::new(Arc::new(MemoryStore::new()), &test_config());
        let issued = issuer.issue("someone@example.org").await.unwrap();

        assert_eq!(issued.cookie.name(), "session");
        assert_eq!(issued.cookie.value(), issued.token.as_str());

        let header = issued.set_cookie_header();
        assert_eq!(
            header,
            format!(
                "session={}; Path=/; HttpOnly; SameSite=Strict; Expires=Thu, 31 Dec 2099 23:59:59 GMT",
                issued.token
            )
        );
    }

    #[tokio::test]
    async fn issue_tokens_are_unique() {
        let issuer = SessionIssuer::new(Arc::new(MemoryStore::new()), &test_config());
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let issued = issuer.issue("a@b.com").await.unwrap();
            assert!(seen.insert(issued.token));
        }
    }

    #[tokio::test]
    async fn issue_rejects_blank_identity_without_store_access() {
        // DownStore would fail any call, so reaching it would surface StoreWrite.
        let issuer = SessionIssuer::new(Arc::new(DownStore), &test_config());
        let err = issuer.issue("   ").await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[tokio::test]
    async fn issue_fails_when_store_write_fails() {
        let issuer = SessionIssuer::new(Arc::new(DownStore), &test_config());
        let err = issuer.issue("a@b.com").await.unwrap_err();
        assert!(matches!(err, Error::StoreWrite(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn issue_fails_when_store_write_times_out() {
        let issuer = SessionIssuer::new(Arc::new(StalledStore), &test_config());
        let err = issuer.issue("a@b.com").await.unwrap_err();
        assert!(matches!(err, Error::StoreWrite(ref e) if e.to_string().contains("timed out")));
    }

    #[tokio::test]
    async fn secure_cookie_follows_config() {
        let config = test_config().with_secure_cookies(true);
        let issuer = SessionIssuer::new(Arc::new(MemoryStore::new()), &config);
        let issued = issuer.issue("a@b.com").await.unwrap();
        assert_eq!(issued.cookie.secure(), Some(true));
    }
}
