//! Bearer-token guard.
//!
//! Every request needs `Authorization: Bearer <api key>` except the
//! lifecycle routes a control command calls without credentials.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::HttpError;

/// Routes served without credentials, matched on exact method and path.
const PUBLIC_ROUTES: &[(Method, &str)] = &[(Method::POST, "/kill"), (Method::GET, "/health")];

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was turned away. The `Display` text is the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization scheme, expected Bearer")]
    WrongScheme,
    #[error("Invalid API key")]
    InvalidKey,
}

/// Stateless credential check shared by all requests.
///
/// Only the pre-built `Bearer <key>` header value is kept, so validation is
/// a single string comparison.
#[derive(Clone)]
pub struct AuthGuard {
    expected: Arc<str>,
}

impl AuthGuard {
    pub fn new(api_key: &str) -> Self {
        Self {
            expected: Arc::from(format!("{BEARER_PREFIX}{api_key}")),
        }
    }

    /// Whether `method path` bypasses authentication.
    pub fn is_public(method: &Method, path: &str) -> bool {
        PUBLIC_ROUTES.iter().any(|(m, p)| m == method && *p == path)
    }

    /// Decide whether a request may proceed.
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<(), AuthRejection> {
        if Self::is_public(method, path) {
            return Ok(());
        }

        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthRejection::MissingHeader)?;

        // Non-ASCII header bytes can never match the expected value.
        let value = value.to_str().map_err(|_| AuthRejection::InvalidKey)?;

        if !value.starts_with(BEARER_PREFIX) {
            return Err(AuthRejection::WrongScheme);
        }
        if value != self.expected.as_ref() {
            return Err(AuthRejection::InvalidKey);
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard").finish_non_exhaustive()
    }
}

/// Auth middleware for `axum::middleware::from_fn_with_state`.
///
/// Rejections become 401 with `WWW-Authenticate: Bearer`; the request never
/// reaches a handler.
pub async fn require_bearer(State(guard): State<AuthGuard>, req: Request, next: Next) -> Response {
    match guard.check(req.method(), req.uri().path(), req.headers()) {
        Ok(()) => next.run(req).await,
        Err(rejection) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %rejection,
                "Unauthorized request"
            );
            HttpError::Unauthorized(rejection.to_string()).into_response()
        }
    }
}
