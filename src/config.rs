use std::time::Duration;

use url::Url;

use crate::error::Error;

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SESSION_PATH: &str = "/api/login/session";

/// Transport used to reach the store, fixed by the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTransport {
    /// `redis://`
    Plain,
    /// `rediss://`
    Tls,
}

/// Session configuration.
///
/// The store URL is a constructor parameter; everything else has a default
/// and can be overridden with the `with_*` methods.
///
/// Use [`from_env()`](SessionConfig::from_env) for convention-based setup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub(crate) store_url: Url,
    pub(crate) store_timeout: Duration,
    pub(crate) secure_cookies: bool,
    pub(crate) session_path: String,
}

impl SessionConfig {
    #[must_use]
    pub fn new(store_url: Url) -> Self {
        Self {
            store_url,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            secure_cookies: false,
            session_path: DEFAULT_SESSION_PATH.into(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `REDIS_URL`: store connection string (`redis://` or `rediss://`)
    ///
    /// # Optional env vars
    /// - `SESSION_STORE_TIMEOUT_MS`: per-call store timeout in milliseconds
    /// - `SESSION_SECURE_COOKIE`: `"1"` or `"true"` adds `Secure` to session cookies
    /// - `SESSION_PATH`: route serving session validation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `REDIS_URL` is missing or any value is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env()`](SessionConfig::from_env), reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `REDIS_URL` is missing or any value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_url = lookup("REDIS_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("Missing REDIS_URL env var".into()))?;
        let store_url: Url = store_url
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("REDIS_URL: {e}")))?;

        let mut config = Self::new(store_url);
        config.transport()?;

        if let Some(ms) = lookup("SESSION_STORE_TIMEOUT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("SESSION_STORE_TIMEOUT_MS: {e}")))?;
            if ms == 0 {
                return Err(Error::Config(
                    "SESSION_STORE_TIMEOUT_MS: must be greater than zero".into(),
                ));
            }
            config = config.with_store_timeout(Duration::from_millis(ms));
        }

        let secure = matches!(
            lookup("SESSION_SECURE_COOKIE").as_deref(),
            Some("1") | Some("true"),
        );

        if let Some(path) = lookup("SESSION_PATH") {
            check_session_path(&path)?;
            config = config.with_session_path(path);
        }

        Ok(config.with_secure_cookies(secure))
    }

    /// Store transport implied by the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for schemes other than `redis` and `rediss`.
    pub fn transport(&self) -> Result<StoreTransport, Error> {
        match self.store_url.scheme() {
            "redis" => Ok(StoreTransport::Plain),
            "rediss" => Ok(StoreTransport::Tls),
            other => Err(Error::Config(format!(
                "REDIS_URL: unsupported scheme `{other}`"
            ))),
        }
    }

    #[must_use]
    pub fn store_url(&self) -> &Url {
        &self.store_url
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    #[must_use]
    pub fn session_path(&self) -> &str {
        &self.session_path
    }

    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_session_path(mut self, path: impl Into<String>) -> Self {
        self.session_path = path.into();
        self
    }
}

/// Route paths must be non-empty and absolute.
pub(crate) fn check_session_path(path: &str) -> Result<(), Error> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(Error::Config("SESSION_PATH: must start with `/`".into()))
    }
}
