use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware, REQUEST_ID_HEADER};
use super::state::AppState;
use super::workflows;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Routes under `/api`
fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/workflows",
            get(workflows::list_workflows).post(workflows::create_workflow),
        )
        // The static segment wins over `{id}`, so GET here is 405 rather than a lookup of "run"
        .route("/workflows/run", post(workflows::run_workflow))
        .route(
            "/workflows/{id}",
            get(workflows::get_workflow).delete(workflows::delete_workflow),
        )
        .route("/steps", get(workflows::list_steps))
        .route("/status", get(health::status_check))
}

pub fn create_router_with_state(state: AppState) -> Router {
    let request_id = axum::http::HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/api", create_api_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Full application router, with the Prometheus endpoint merged in when enabled
pub fn create_app_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let router = create_router_with_state(state);

    match metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics, metrics_path)),
        None => router,
    }
}
