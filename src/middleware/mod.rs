//! Axum integration for cookie sessions.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use opaque_session::{RedisStore, SessionConfig};
//! use opaque_session::middleware::{SessionIdentity, SessionState, session_routes};
//!
//! // 1. Configure from environment (fails before any connection if REDIS_URL is unset)
//! let config = SessionConfig::from_env()?;
//!
//! // 2. Build the store once and share it
//! let state = SessionState::new(&config, Arc::new(RedisStore::new(&config)?));
//!
//! // 3. Mount the validation route
//! let app = axum::Router::new().merge(session_routes(state.clone())?);
//!
//! // 4. After your own login logic has authenticated a user:
//! async fn login(State(state): State<SessionState<RedisStore>>) -> Result<IssuedSession, SessionError> {
//!     Ok(state.issuer().issue("user@example.com").await?)
//! }
//! ```

mod error;
mod extractor;
mod routes;
mod state;
mod types;

pub use error::SessionError;
pub use extractor::{SessionIdentity, cookie_header};
pub use routes::session_routes;
pub use state::SessionState;
pub use types::SessionBody;
