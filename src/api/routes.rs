use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::{reports, resources},
    auth::{api as auth_api, auth_middleware, require_role, AuthState},
    db::HospitalDb,
    middleware::request_logging,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<HospitalDb>,
}

/// Create the API router
///
/// Protected routes run the token stage first, then the role stage; every
/// protected path must have a matching entry in the route policy table.
pub fn create_router(db: Arc<HospitalDb>, auth_state: AuthState) -> Router {
    let state = AppState { db };
    let jwt_handler = auth_state.jwt_handler.clone();

    let auth_router = Router::new()
        .route("/login", post(auth_api::login))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route(
            "/doctor",
            post(resources::create_doctor).get(resources::list_doctors),
        )
        .route("/doctor/:id", get(resources::get_doctor))
        .route("/patient", post(resources::create_patient))
        .route("/patient/:id", get(resources::get_patient))
        .route("/assistant", post(resources::create_assistant))
        .route("/assistant/:id", get(resources::get_assistant))
        .route("/treatment", post(resources::create_treatment))
        .route("/treatment/:id", get(resources::get_treatment))
        .route(
            "/patient_assistant",
            post(resources::assign_patient_to_assistant),
        )
        .route("/report/doctors_patients", get(reports::doctors_patients))
        .route(
            "/report/treatments/:patient_id",
            get(reports::treatments_for_patient),
        )
        .route("/me", get(auth_api::get_current_user))
        .route_layer(from_fn(require_role))
        .route_layer(from_fn_with_state(jwt_handler, auth_middleware))
        .with_state(state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{policy::ROUTE_POLICY, JwtHandler, StaticCredentials, UserRole};
    use crate::db::StoreOptions;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use parking_lot::Mutex;
    use std::io;
    use tower::ServiceExt;

    /// Shared buffer the test subscriber writes formatted events into
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn test_app() -> (Router, Arc<JwtHandler>) {
        let db = Arc::new(HospitalDb::in_memory(StoreOptions::default()).unwrap());
        let jwt = Arc::new(JwtHandler::new("routes-test-secret".to_string()));
        let auth = AuthState::new(Arc::new(StaticCredentials::default()), jwt.clone());
        (create_router(db, auth), jwt)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_requests_are_traced_by_tower_http() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (app, _) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let output = logs.text();
        assert!(output.contains("tower_http::trace"), "{output}");
        assert!(output.contains("finished processing request"), "{output}");
    }

    /// Every declared rule must point at a mounted route: a GM token never
    /// gets 403 from the guard on a listed path.
    #[tokio::test]
    async fn test_every_policy_rule_is_routed() {
        let (app, jwt) = test_app();
        let (token, _) = jwt.generate_token(UserRole::GeneralManager).unwrap();

        for rule in ROUTE_POLICY {
            let uri = rule.path.replace(":id", "1").replace(":patient_id", "1");
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(rule.method)
                        .uri(&uri)
                        .header(header::AUTHORIZATION, format!("Bearer {token}"))
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_ne!(response.status(), StatusCode::FORBIDDEN, "{} {}", rule.method, uri);
            assert_ne!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{} {}",
                rule.method,
                uri
            );
        }
    }
}
