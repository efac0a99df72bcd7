//! JWT Token Handler
//! Mission: Generate and validate role-bearing JWT tokens

use crate::auth::models::{Claims, UserRole};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    /// Override the token lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Generate a JWT token asserting `role`
    pub fn generate_token(&self, role: UserRole) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?
            .timestamp()
            .max(0) as usize;

        let expires_in = self.ttl.num_seconds().max(0) as usize;

        let claims = Claims {
            sub: role,
            iat: now.timestamp().max(0) as usize,
            exp: expiration,
        };

        debug!(role = %role, expires_in, "Generating JWT");

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate JWT")?;

        Ok((token, expires_in))
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Invalid or expired token")?;

        debug!(role = %decoded.claims.sub, "Validated JWT");

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_validation() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        let (token, expires_in) = handler.generate_token(UserRole::Doctor).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 15 * 60);

        let claims = handler.validate_token(&token).unwrap();
        assert_eq!(claims.sub, UserRole::Doctor);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        let result = handler.validate_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1".to_string());
        let handler2 = JwtHandler::new("secret2".to_string());

        let (token, _) = handler1.generate_token(UserRole::GeneralManager).unwrap();

        let result = handler2.validate_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well past the default 60s validation leeway
        let handler =
            JwtHandler::new("test-secret-key-12345".to_string()).with_ttl(Duration::hours(-2));

        let (token, expires_in) = handler.generate_token(UserRole::Assistant).unwrap();
        assert_eq!(expires_in, 0);
        assert!(handler.validate_token(&token).is_err());
    }

    #[test]
    fn test_custom_ttl() {
        let handler =
            JwtHandler::new("test-secret-key-12345".to_string()).with_ttl(Duration::hours(1));

        let (token, expires_in) = handler.generate_token(UserRole::GeneralManager).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = handler.validate_token(&token).unwrap();
        assert_eq!(claims.sub, UserRole::GeneralManager);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }
}
