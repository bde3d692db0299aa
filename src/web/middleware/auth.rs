use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::web::{AppState, error::AppError};

/// Guards the admin and capture routes with the configured admin token, sent
/// as `Authorization: Bearer <token>` or in a `token` cookie.
pub async fn admin_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    // Try to get token from Authorization header first, then fall back to cookie
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::Unauthorized("Missing admin token".to_string()))?;

    if !constant_time_eq(token.as_bytes(), state.config.admin_token.as_bytes()) {
        warn!(path = %req.uri().path(), "Rejected request with a wrong admin token.");
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(next.run(req).await)
}

/// Compares SHA-256 digests of both sides, so neither the content nor the
/// length of the configured token shows in the timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let hash_a = Sha256::digest(a);
    let hash_b = Sha256::digest(b);
    hash_a.ct_eq(&hash_b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"s3cret", b"s3cret"));
        assert!(!constant_time_eq(b"s3cret", b"s3creT"));
        assert!(!constant_time_eq(b"s3cret", b"s3cre"));
        assert!(!constant_time_eq(b"s3cret", b"s3cret-and-more"));
        assert!(!constant_time_eq(b"", b"s3cret"));
        assert!(constant_time_eq(b"", b""));
    }
}
