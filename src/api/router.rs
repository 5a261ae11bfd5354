use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;

/// Build the full router
///
/// Health probes sit outside the logging layer so they do not flood the log.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/authenticate", post(auth::authenticate))
        .nest("/auth", auth::create_auth_router())
        .layer(middleware::from_fn(logging_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(api)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}
