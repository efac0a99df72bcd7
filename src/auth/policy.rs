//! Route Access Policy
//! Mission: Declare, per protected route, which roles may call it
//!
//! Paths are axum route templates exactly as registered on the router, so the
//! role guard can match them against `MatchedPath`.

use crate::auth::models::UserRole;

const GM: &[UserRole] = &[UserRole::GeneralManager];
const CLINICAL: &[UserRole] = &[UserRole::Doctor, UserRole::GeneralManager];
const ALL_STAFF: &[UserRole] = &[
    UserRole::Doctor,
    UserRole::GeneralManager,
    UserRole::Assistant,
];

/// Who may call a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any caller holding a valid token
    Authenticated,
    /// Only the listed roles
    Roles(&'static [UserRole]),
}

impl Access {
    pub fn permits(&self, role: UserRole) -> bool {
        match self {
            Access::Authenticated => true,
            Access::Roles(roles) => roles.contains(&role),
        }
    }
}

/// One row of the policy table
#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    pub method: &'static str,
    pub path: &'static str,
    pub access: Access,
}

const fn rule(method: &'static str, path: &'static str, access: Access) -> RoutePolicy {
    RoutePolicy {
        method,
        path,
        access,
    }
}

pub static ROUTE_POLICY: &[RoutePolicy] = &[
    rule("POST", "/doctor", Access::Roles(GM)),
    rule("GET", "/doctor", Access::Authenticated),
    rule("GET", "/doctor/:id", Access::Authenticated),
    rule("POST", "/patient", Access::Roles(CLINICAL)),
    rule("GET", "/patient/:id", Access::Authenticated),
    rule("POST", "/assistant", Access::Roles(GM)),
    rule("GET", "/assistant/:id", Access::Authenticated),
    rule("POST", "/treatment", Access::Roles(ALL_STAFF)),
    rule("GET", "/treatment/:id", Access::Authenticated),
    rule("POST", "/patient_assistant", Access::Roles(CLINICAL)),
    rule("GET", "/report/doctors_patients", Access::Roles(GM)),
    rule("GET", "/report/treatments/:patient_id", Access::Roles(CLINICAL)),
    rule("GET", "/me", Access::Authenticated),
];

/// Look up the access rule for a route. `None` means the route is not
/// declared and must be refused.
pub fn access_for(method: &str, path: &str) -> Option<Access> {
    ROUTE_POLICY
        .iter()
        .find(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
        .map(|r| r.access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_gm_only_routes_reject_other_roles() {
        for (method, path) in [
            ("POST", "/doctor"),
            ("POST", "/assistant"),
            ("GET", "/report/doctors_patients"),
        ] {
            let access = access_for(method, path).unwrap();
            assert!(access.permits(UserRole::GeneralManager));
            assert!(!access.permits(UserRole::Doctor), "{method} {path}");
            assert!(!access.permits(UserRole::Assistant), "{method} {path}");
        }
    }

    #[test]
    fn test_treatment_creation_open_to_all_staff() {
        let access = access_for("POST", "/treatment").unwrap();
        for role in UserRole::ALL {
            assert!(access.permits(role));
        }
    }

    #[test]
    fn test_clinical_routes() {
        for (method, path) in [
            ("POST", "/patient"),
            ("POST", "/patient_assistant"),
            ("GET", "/report/treatments/:patient_id"),
        ] {
            let access = access_for(method, path).unwrap();
            assert!(access.permits(UserRole::Doctor));
            assert!(access.permits(UserRole::GeneralManager));
            assert!(!access.permits(UserRole::Assistant), "{method} {path}");
        }
    }

    #[test]
    fn test_reads_open_to_any_role() {
        assert_eq!(access_for("GET", "/doctor"), Some(Access::Authenticated));
        assert_eq!(
            access_for("get", "/patient/:id"),
            Some(Access::Authenticated)
        );
    }

    #[test]
    fn test_unknown_route_has_no_rule() {
        assert_eq!(access_for("DELETE", "/doctor/:id"), None);
        assert_eq!(access_for("GET", "/admin"), None);
    }

    #[test]
    fn test_no_duplicate_rules() {
        let mut seen = HashSet::new();
        for r in ROUTE_POLICY {
            assert!(seen.insert((r.method, r.path)), "{} {}", r.method, r.path);
        }
    }
}
