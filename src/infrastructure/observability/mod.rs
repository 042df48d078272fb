//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_health_check, record_http_request, record_step,
    record_workflow_run, PrometheusMetrics,
};
