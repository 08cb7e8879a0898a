use axum::Json;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::issuer::IssuedSession;
use crate::types::Identity;

/// Success body for session endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SessionBody {
    pub success: bool,
    pub email: Identity,
}

impl SessionBody {
    #[must_use]
    pub fn new(email: Identity) -> Self {
        Self {
            success: true,
            email,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ErrorBody {
    success: bool,
    message: String,
}

impl ErrorBody {
    pub(super) fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `200` with the session cookie in `Set-Cookie`.
impl IntoResponse for IssuedSession {
    fn into_response(self) -> Response {
        let cookie = match HeaderValue::from_str(&self.set_cookie_header()) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Session cookie is not a valid header value");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Internal server error")),
                )
                    .into_response();
            }
        };

        ([(SET_COOKIE, cookie)], Json(SessionBody::new(self.identity))).into_response()
    }
}
