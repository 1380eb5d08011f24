//! Authenticated-user extraction.
//!
//! Session issuance and validation live in an upstream gateway; by the
//! time a request reaches this service the gateway has already resolved
//! the session and injected the opaque user id as the `X-User-Id` header.
//! Handlers that act on user data take the `Authenticated` extractor.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde::Serialize;

/// Authenticated user extractor.
///
/// ```ignore
/// async fn my_handler(auth: Authenticated) -> impl IntoResponse {
///     let user_id = auth.user_id;
///     // ...
/// }
/// ```
pub struct Authenticated {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub code: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<AuthErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(AuthErrorResponse {
                        error: "Missing authenticated user".to_string(),
                        code: "UNAUTHENTICATED".to_string(),
                    }),
                )
            })?;

        Ok(Authenticated {
            user_id: user_id.to_string(),
        })
    }
}
