use crate::handlers::{authorize_handler, token_handler, AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // OAuth 2.0 token endpoint (client credentials)
        .route("/api/v1/oauth/token", post(token_handler::handle_token))
        // Per-request authorization check for the gateway
        .route("/api/v1/authorize", post(authorize_handler::handle_authorize))
        // Health check
        .route("/health", get(health_check))
        // Prometheus exposition
        .route("/metrics", get(render_metrics))
        // Tracing middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
