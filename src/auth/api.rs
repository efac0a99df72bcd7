//! Authentication API Endpoints
//! Mission: Provide login and identity endpoints

use crate::auth::{
    credentials::CredentialVerifier,
    jwt::JwtHandler,
    middleware::extract_claims,
    models::{LoginRequest, LoginResponse, MeResponse},
};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialVerifier>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(credentials: Arc<dyn CredentialVerifier>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            credentials,
            jwt_handler,
        }
    }
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| AuthApiError::BadRequest(e.body_text()))?;

    let username = payload
        .username
        .ok_or_else(|| AuthApiError::BadRequest("Missing field: username".to_string()))?;
    let password = payload
        .password
        .ok_or_else(|| AuthApiError::BadRequest("Missing field: password".to_string()))?;

    info!(username = %username, "Login attempt");

    let Some(role) = state.credentials.verify(&username, &password) else {
        warn!(username = %username, "Failed login attempt");
        return Err(AuthApiError::InvalidCredentials);
    };

    let (access_token, expires_in) = state.jwt_handler.generate_token(role).map_err(|e| {
        error!("Token generation failed: {e:#}");
        AuthApiError::InternalError
    })?;

    info!(username = %username, role = %role, "Login successful");

    Ok(Json(LoginResponse {
        access_token,
        expires_in,
        role,
    }))
}

/// Get current identity - GET /me
pub async fn get_current_user(req: Request) -> Result<Json<MeResponse>, AuthApiError> {
    let claims = extract_claims(&req).ok_or(AuthApiError::Unauthorized)?;

    // Built from the JWT claims alone
    let expires_at = Utc
        .timestamp_opt(claims.exp as i64, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    Ok(Json(MeResponse {
        role: claims.sub,
        expires_at,
    }))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    Unauthorized,
    BadRequest(String),
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Bad credentials".to_string())
            }
            AuthApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            AuthApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
