//! HTTP error type and its JSON rendering.
//!
//! Every handler error is converted here, at the request boundary, into a
//! status code and a `{"error": "..."}` body. Nothing propagates further.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use askgate_core::{AskError, CoreError};

use crate::models::ErrorResponse;

/// Gateway error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Missing or invalid request fields.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, malformed or mismatched bearer credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unknown route.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Known route, wrong method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Upstream failure, malformed JSON body, or anything unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    /// Status code this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::MethodNotAllowed(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut res = (status, Json(ErrorResponse::new(self.message()))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        res
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::Upstream(ask_err) => ask_err.into(),
            CoreError::Configuration(cfg_err) => Self::Internal(cfg_err.to_string()),
        }
    }
}

impl From<AskError> for HttpError {
    fn from(err: AskError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Malformed JSON bodies are reported as 500 with the parser's message.
impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HttpError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::MethodNotAllowed(String::new()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            HttpError::from(AskError::Failed("quota".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_validation_maps_to_bad_request() {
        let err: HttpError = CoreError::Validation("Missing 'content'".into()).into();
        assert!(matches!(err, HttpError::BadRequest(ref m) if m == "Missing 'content'"));
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let res = HttpError::Unauthorized("Invalid API key".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn test_malformed_json_is_internal() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = HttpError::from(parse_err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().is_empty());
    }
}
