//! Bearer-token middleware for protected routes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Validates the `Authorization: Bearer <token>` header and makes the
/// decoded claims available to handlers through request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("missing bearer token".into()).into_response();
        }
    };

    match state.auth.verify_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_requires_the_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));

        let mut bare = HeaderMap::new();
        bare.insert("authorization", "abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&bare), None);

        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
