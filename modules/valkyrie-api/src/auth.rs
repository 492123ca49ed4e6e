use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::AppState;

/// Authenticated admin caller. Extract this in handlers that require the
/// shared admin bearer token; a missing or wrong token is rejected before
/// the handler body runs, and therefore before any store access.
pub struct AdminToken;

impl FromRequestParts<Arc<AppState>> for AdminToken {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let Some(token) = header_value.strip_prefix("Bearer ") else {
            return Err(unauthorized("Unauthorized"));
        };

        if !constant_time_eq(token.as_bytes(), state.admin_token.as_bytes()) {
            return Err(unauthorized("Invalid token"));
        }

        Ok(AdminToken)
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
