//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation and role checks
//!
//! Two stages, layered token-first:
//! 1. [`auth_middleware`] verifies the bearer token and stores its claims.
//! 2. [`require_role`] consults [`ROUTE_POLICY`](crate::auth::policy::ROUTE_POLICY)
//!    for the matched route and refuses roles that are not listed.

use crate::auth::{jwt::JwtHandler, models::Claims, policy};
use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Auth middleware that validates JWT tokens
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    // Validate token and extract claims
    let claims = jwt_handler
        .validate_token(token)
        .map_err(|_| AuthError::InvalidToken)?;

    // Add claims to request extensions so later stages and handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role guard: must run after [`auth_middleware`] on routes registered with
/// `route_layer`, where `MatchedPath` is available.
pub async fn require_role(req: Request, next: Next) -> Result<Response, AuthError> {
    let role = extract_claims(&req)
        .map(|c| c.sub)
        .ok_or(AuthError::MissingToken)?;

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let method = req.method().as_str().to_string();

    match policy::access_for(&method, &path) {
        Some(access) if access.permits(role) => {
            debug!(role = %role, method = %method, path = %path, "Role check passed");
            Ok(next.run(req).await)
        }
        Some(_) => {
            warn!(role = %role, method = %method, path = %path, "Role not permitted");
            Err(AuthError::Forbidden)
        }
        None => {
            warn!(method = %method, path = %path, "Route has no access rule");
            Err(AuthError::Forbidden)
        }
    }
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format. Use: Bearer {token}",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
