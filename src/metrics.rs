use axum::{routing::get, Router};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and publish the static
    /// threshold gauges so dashboards can draw the band floors.
    pub fn init(watch_threshold: i32, act_now_threshold: i32) -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();
        let handle = builder.install_recorder()?;

        gauge!("triage_watch_threshold").set(watch_threshold as f64);
        gauge!("triage_act_now_threshold").set(act_now_threshold as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One scored request, labeled by resulting band.
pub fn record_score_request(band: &str) {
    counter!("triage_score_requests_total", "band" => band.to_string()).increment(1);
}

/// One velocity alert fired.
pub fn record_velocity_alert() {
    counter!("triage_velocity_alerts_total").increment(1);
}
