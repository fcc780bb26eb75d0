//! Admin authentication middleware.
//!
//! The admin surface is protected by a single shared token configured at
//! deploy time and sent by the storefront admin panel in `X-Admin-Token`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Middleware that requires the configured admin token.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let expected = state.config.security.admin_token.as_str();
    match provided {
        Some(token) if !expected.is_empty() && token == expected => next.run(req).await,
        _ => ApiError::Unauthorized("Invalid or missing admin token".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_token_header_constant() {
        assert_eq!(ADMIN_TOKEN_HEADER, "X-Admin-Token");
    }
}
