//! Key-value store seam for session records.
//!
//! The issuer and validator only need `GET` and `SET` on string keys and
//! values. [`MemoryStore`] keeps records in-process; [`RedisStore`] (feature
//! `redis`) talks to Redis over one shared, lazily opened connection.

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

use std::future::Future;
use std::time::Duration;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

use crate::error::BoxError;

/// Minimal key-value capability backing session records.
///
/// Implementations must be safe to share across concurrent requests. Writes
/// carry no expiry.
///
/// # Example
///
/// ```rust,ignore
/// impl KeyValueStore for MyStore {
///     async fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
///         Ok(self.db.lookup(key).await?)
///     }
///
///     async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
///         self.db.put(key, value).await?;
///         Ok(())
///     }
/// }
/// ```
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read a value. `None` if the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, BoxError>> + Send;

    /// Write a value with no expiry, overwriting any existing one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Run a store call under `limit`, folding elapsed time into the call's error.
pub(crate) async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, BoxError>
where
    F: Future<Output = Result<T, BoxError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(format!("store call timed out after {}ms", limit.as_millis()).into()),
    }
}
