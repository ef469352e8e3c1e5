//! Request counters and latency histograms, exposed in the Prometheus text
//! format. The recorder is installed once per process; handlers record
//! through the `metrics` facade macros and `/metrics` renders the handle.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

const REQUEST_COUNT: &str = "app_request_count";
const REQUEST_LATENCY: &str = "app_request_latency_seconds";

const LATENCY_SECONDS_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the Prometheus recorder, or returns the existing handle when one
/// is already active in this process.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    HANDLE
        .get_or_try_init(|| {
            let recorder = PrometheusBuilder::new()
                .set_buckets(LATENCY_SECONDS_BUCKETS)?
                .build_recorder();
            let handle = recorder.handle();

            if metrics::set_global_recorder(recorder).is_ok() {
                describe_counter!(REQUEST_COUNT, "Application Request Count");
                describe_histogram!(
                    REQUEST_LATENCY,
                    Unit::Seconds,
                    "Application Request Latency"
                );
            }
            Ok(handle)
        })
        .cloned()
}

pub fn record_count(method: &'static str, endpoint: &'static str, status: u16) {
    counter!(
        REQUEST_COUNT,
        "method" => method,
        "endpoint" => endpoint,
        "http_status" => status.to_string()
    )
    .increment(1);
}

pub fn record_latency(method: &'static str, endpoint: &'static str, status: u16, started: Instant) {
    histogram!(
        REQUEST_LATENCY,
        "method" => method,
        "endpoint" => endpoint,
        "http_status" => status.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let handle = install().expect("first install");
        install().expect("second install");

        record_count("GET", "/home", 200);
        let exposition = handle.render();
        assert!(exposition.contains(REQUEST_COUNT));
    }
}
