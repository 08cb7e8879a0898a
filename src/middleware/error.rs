use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorBody;
use crate::error::Error;

/// Body shared by both unauthenticated outcomes.
const UNAUTHENTICATED_MESSAGE: &str = "Invalid or expired session";

/// Session errors at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No `session` cookie in the request.
    #[error("No session cookie found")]
    NoSession,

    /// The session cookie does not resolve to an identity.
    #[error("Invalid or expired session")]
    InvalidOrExpired,

    #[error(transparent)]
    Session(#[from] Error),
}

impl SessionError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoSession | Self::InvalidOrExpired => StatusCode::UNAUTHORIZED,
            Self::Session(Error::MalformedInput(_)) => StatusCode::BAD_REQUEST,
            Self::Session(Error::Config(_) | Error::StoreWrite(_) | Error::StoreRead(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::NoSession | Self::InvalidOrExpired => UNAUTHENTICATED_MESSAGE.to_owned(),
            Self::Session(Error::MalformedInput(_)) => self.to_string(),
            Self::Session(Error::Config(msg)) => {
                tracing::error!(error = %self, "Session configuration error");
                msg.clone()
            }
            Self::Session(Error::StoreWrite(_)) => {
                tracing::error!(error = %self, "Session store error");
                "Failed to store session".to_owned()
            }
            Self::Session(Error::StoreRead(_)) => {
                tracing::error!(error = %self, "Session store error");
                "Internal server error".to_owned()
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
