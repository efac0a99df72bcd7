//! Credential Verification
//! Mission: Map a username/password pair to a staff role

use crate::auth::models::UserRole;

/// Anything that can decide which role, if any, a login pair grants.
///
/// The login handler only sees this trait, so a real identity provider can
/// replace [`StaticCredentials`] without touching routing or the role guard.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Option<UserRole>;
}

/// Fixed login table with one account per role
pub struct StaticCredentials {
    entries: Vec<(String, String, UserRole)>,
}

impl StaticCredentials {
    pub fn new(entries: Vec<(String, String, UserRole)>) -> Self {
        Self { entries }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(vec![
            ("admin".into(), "admin".into(), UserRole::GeneralManager),
            ("doctor".into(), "doctor".into(), UserRole::Doctor),
            ("assistant".into(), "assistant".into(), UserRole::Assistant),
        ])
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<UserRole> {
        self.entries
            .iter()
            .find(|(u, p, _)| u == username && p == password)
            .map(|(_, _, role)| *role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_maps_each_role() {
        let creds = StaticCredentials::default();

        assert_eq!(
            creds.verify("admin", "admin"),
            Some(UserRole::GeneralManager)
        );
        assert_eq!(creds.verify("doctor", "doctor"), Some(UserRole::Doctor));
        assert_eq!(
            creds.verify("assistant", "assistant"),
            Some(UserRole::Assistant)
        );
    }

    #[test]
    fn test_rejects_unknown_pairs() {
        let creds = StaticCredentials::default();

        assert_eq!(creds.verify("wrong_user", "wrong_pass"), None);
        assert_eq!(creds.verify("admin", "doctor"), None);
        assert_eq!(creds.verify("ADMIN", "admin"), None);
        assert_eq!(creds.verify("", ""), None);
    }

    #[test]
    fn test_custom_table() {
        let creds = StaticCredentials::new(vec![(
            "nurse".into(),
            "s3cret".into(),
            UserRole::Assistant,
        )]);

        assert_eq!(creds.verify("nurse", "s3cret"), Some(UserRole::Assistant));
        assert_eq!(creds.verify("admin", "admin"), None);
    }
}
