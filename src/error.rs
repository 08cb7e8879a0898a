/// Boxed error returned by [`KeyValueStore`](crate::store::KeyValueStore) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Required configuration is missing or unusable.
    #[error("{0}")]
    Config(String),

    /// Caller-supplied input failed validation. No store access was attempted.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The store rejected or timed out on a session write.
    #[error("Failed to store session: {0}")]
    StoreWrite(#[source] BoxError),

    /// The store failed or timed out on a session lookup.
    #[error("Failed to read session: {0}")]
    StoreRead(#[source] BoxError),
}

impl Error {
    /// HTTP status code this error maps to at a request boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedInput(_) => 400,
            Self::Config(_) | Self::StoreWrite(_) | Self::StoreRead(_) => 500,
        }
    }
}
