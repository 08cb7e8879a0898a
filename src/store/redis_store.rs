use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ConnectionAddr};
use tokio::sync::OnceCell;

use super::KeyValueStore;
use crate::config::{SessionConfig, StoreTransport};
use crate::error::{BoxError, Error};

/// Redis-backed session store.
///
/// Build once at startup and share by `Arc`. Construction only parses the
/// URL; the connection is opened on first use and then reused by every
/// caller. `rediss://` URLs connect over TLS.
pub struct RedisStore {
    client: redis::Client,
    transport: StoreTransport,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is not a usable Redis URL.
    pub fn new(config: &SessionConfig) -> Result<Self, Error> {
        let transport = config.transport()?;
        let client = redis::Client::open(config.store_url().as_str())
            .map_err(|e| Error::Config(format!("REDIS_URL: {e}")))?;

        let negotiates_tls = matches!(
            client.get_connection_info().addr,
            ConnectionAddr::TcpTls { .. }
        );
        if negotiates_tls != (transport == StoreTransport::Tls) {
            return Err(Error::Config(
                "REDIS_URL: transport does not match URL scheme".into(),
            ));
        }

        Ok(Self {
            client,
            transport,
            connection: OnceCell::new(),
        })
    }

    #[must_use]
    pub fn transport(&self) -> StoreTransport {
        self.transport
    }

    /// Whether the shared connection has been opened yet.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connection(&self) -> Result<ConnectionManager, BoxError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                tracing::debug!(transport = ?self.transport, "Opening Redis connection");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(manager.clone())
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}
