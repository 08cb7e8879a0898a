use axum::routing::get;
use axum::{Json, Router};

use super::extractor::SessionIdentity;
use super::state::SessionState;
use super::types::SessionBody;
use crate::config::check_session_path;
use crate::error::Error;
use crate::store::KeyValueStore;

/// Create the session router.
///
/// Serves `GET {session_path}`: `200 {"success": true, "email": ...}` for a
/// valid session cookie, otherwise a [`SessionError`](super::SessionError) response.
///
/// # Errors
///
/// Returns [`Error::Config`] if the configured session path does not start with `/`.
pub fn session_routes<S: KeyValueStore>(state: SessionState<S>) -> Result<Router, Error> {
    let session_path = state.session_path.clone();
    check_session_path(&session_path)?;

    Ok(Router::new()
        .route(&session_path, get(current_session))
        .with_state(state))
}

async fn current_session(SessionIdentity(identity): SessionIdentity) -> Json<SessionBody> {
    Json(SessionBody::new(identity))
}
