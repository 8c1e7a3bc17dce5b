//! Health and metrics endpoints

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check with dispatcher counters
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "llm_provider": state.config.llm.provider,
        "store": state.config.store.backend.as_str(),
        "events_handled": state.stats.handled(),
        "events_failed": state.stats.failed(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use slack_translator_config::Settings;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::state::DispatchStats;

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(AppState::new(Settings::default(), Arc::default()));
        let (status, body) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_counters() {
        let stats = Arc::new(DispatchStats::default());
        stats.record(true);
        stats.record(false);

        let router = create_router(AppState::new(Settings::default(), stats));
        let (status, body) = get_json(router, "/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "sqlite");
        assert_eq!(body["events_handled"], 2);
        assert_eq!(body["events_failed"], 1);
    }
}
