use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use super::error::SessionError;
use super::state::SessionState;
use crate::store::KeyValueStore;
use crate::types::Identity;
use crate::validator::Validation;

/// Identity resolved from the request's session cookie.
///
/// Use as an Axum extractor in route handlers. Rejects with `401` when there
/// is no session or the token is unknown, and `500` when the store fails.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(SessionIdentity(identity): SessionIdentity) -> impl IntoResponse {
///     format!("Signed in as {identity}")
/// }
///
/// // Optional: accessible to both signed-in and anonymous users
/// async fn home(identity: Option<SessionIdentity>) -> impl IntoResponse {
///     match identity {
///         Some(SessionIdentity(id)) => format!("Hello, {id}"),
///         None => "Hello, guest".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity(pub Identity);

impl<S: KeyValueStore> FromRequestParts<SessionState<S>> for SessionIdentity {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SessionState<S>,
    ) -> Result<Self, Self::Rejection> {
        let header = cookie_header(&parts.headers);

        match state.validator.validate(&header).await? {
            Validation::Valid(identity) => Ok(Self(identity)),
            Validation::NoSession => Err(SessionError::NoSession),
            Validation::InvalidOrExpired => Err(SessionError::InvalidOrExpired),
        }
    }
}

/// `None` for anonymous requests; store failures still reject.
impl<S: KeyValueStore> OptionalFromRequestParts<SessionState<S>> for SessionIdentity {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SessionState<S>,
    ) -> Result<Option<Self>, Self::Rejection> {
        let header = cookie_header(&parts.headers);
        let outcome = state.validator.validate(&header).await?;
        Ok(outcome.into_identity().map(Self))
    }
}

/// All `Cookie` header lines joined with `"; "`. Non-UTF-8 lines are skipped.
#[must_use]
pub fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}
