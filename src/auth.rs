//! Bearer-token gate in front of the bookmark routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::BookmarkError;
use crate::handler::AppState;

/// Token from an `Authorization: Bearer <token>` header, if well formed.
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects the request with 401 unless it carries the configured API token.
pub async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = bearer_token(&request).is_some_and(|token| token == state.api_token.as_str());
    if !authorized {
        tracing::error!("Unauthorized request to path: {}", request.uri().path());
        return BookmarkError::Unauthorized.into_response();
    }

    next.run(request).await
}
