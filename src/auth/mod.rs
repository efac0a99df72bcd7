//! Authentication Module
//! Mission: Secure API access with role-bearing JWT tokens and a route policy

pub mod api;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod policy;

pub use api::AuthState;
pub use credentials::{CredentialVerifier, StaticCredentials};
pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, require_role};
pub use models::{Claims, UserRole};
