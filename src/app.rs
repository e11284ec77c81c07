use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::IdentityVerifier;
use crate::config::SecurityConfig;
use crate::database::TaskStore;
use crate::handlers;
use crate::middleware::require_identity;
use crate::services::TaskAccessor;

/// Per-process state shared by every request. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub verifier: IdentityVerifier,
    pub accessor: TaskAccessor,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(jwt_secret: &str, store: Arc<dyn TaskStore>) -> Self {
        Self {
            verifier: IdentityVerifier::new(jwt_secret),
            accessor: TaskAccessor::new(store),
            started_at: Instant::now(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        // Protected
        .merge(task_routes(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn task_routes(state: AppState) -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route_layer(from_fn_with_state(state, require_identity))
}

/// CORS policy from configuration; `None` when CORS is disabled.
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(enable_cors: bool, origins: &[&str]) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "s".to_string(),
            jwt_expiry_hours: 1,
            enable_cors,
            cors_origins: origins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn cors_disabled_yields_no_layer() {
        assert!(cors_layer(&security(false, &["*"])).is_none());
    }

    #[test]
    fn cors_enabled_yields_layer() {
        assert!(cors_layer(&security(true, &["*"])).is_some());
        assert!(cors_layer(&security(true, &["https://app.example.com"])).is_some());
    }
}
