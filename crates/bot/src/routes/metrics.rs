//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::throttle::Throttle;

/// State of the metrics route: the recorder handle plus the components
/// sampled into gauges at scrape time.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub throttle: Arc<Throttle>,
}

/// GET /metrics: returns Prometheus-formatted metrics.
pub async fn get(State(state): State<MetricsState>) -> impl IntoResponse {
    metrics::gauge!("bot_throttle_tracked_users").set(state.throttle.tracked().await as f64);
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.handle.render(),
    )
}
