//! Authentication Models
//! Mission: Define the roles, token claims, and login payloads

use serde::{Deserialize, Serialize};

/// Staff roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "General Manager")]
    GeneralManager, // Full access, including staff creation and reports
    #[serde(rename = "Doctor")]
    Doctor, // Patients, treatments, assignments, treatment reports
    #[serde(rename = "Assistant")]
    Assistant, // Treatments + reads
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [
        UserRole::GeneralManager,
        UserRole::Doctor,
        UserRole::Assistant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::GeneralManager => "General Manager",
            UserRole::Doctor => "Doctor",
            UserRole::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserRole, // subject is the role itself; there are no user accounts
    pub iat: usize,
    pub exp: usize, // expiration timestamp
}

/// Login request body
///
/// Fields are optional so a missing one can be reported as a 400 with the
/// field name instead of a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: usize, // seconds until expiration
    pub role: UserRole,
}

/// Identity echoed back from a verified token
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub role: UserRole,
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let gm = UserRole::GeneralManager;
        let json = serde_json::to_string(&gm).unwrap();
        assert_eq!(json, r#""General Manager""#);

        let doctor: UserRole = serde_json::from_str(r#""Doctor""#).unwrap();
        assert_eq!(doctor, UserRole::Doctor);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::GeneralManager.as_str(), "General Manager");
        assert_eq!(UserRole::Doctor.as_str(), "Doctor");
        assert_eq!(UserRole::Assistant.as_str(), "Assistant");

        // Display and serde agree on the wire name
        for role in UserRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"admin"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("admin"));
        assert!(req.password.is_none());
    }
}
