#![doc = include_str!("../README.md")]

pub mod config;
pub mod cookies;
pub mod error;
pub mod issuer;
#[cfg(feature = "axum")]
pub mod middleware;
pub mod store;
pub mod types;
pub mod validator;

// Re-exports for convenient access
pub use config::{SessionConfig, StoreTransport};
pub use cookies::{
    SESSION_COOKIE_NAME, cookie_value, parse_cookie_header, session_cookie, set_cookie_header,
};
pub use error::{BoxError, Error};
pub use issuer::{IssuedSession, SessionIssuer};
#[cfg(feature = "redis")]
pub use store::RedisStore;
pub use store::{KeyValueStore, MemoryStore};
pub use types::{Identity, SessionToken};
pub use validator::{SessionValidator, Validation};
