//! Prometheus metrics.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use lazy_static::lazy_static;
use prometheus::IntCounter;

use crate::{Result, ServerError};

lazy_static! {
    /// Pull requests created.
    pub static ref PULL_REQUESTS_CREATED: IntCounter =
        IntCounter::new("pull_requests_created", "Pull requests created").unwrap();
    /// Pull requests merged.
    pub static ref PULL_REQUESTS_MERGED: IntCounter =
        IntCounter::new("pull_requests_merged", "Pull requests merged").unwrap();
    /// Reviewer reassignments.
    pub static ref REVIEWERS_REASSIGNED: IntCounter =
        IntCounter::new("reviewers_reassigned", "Reviewer reassignments").unwrap();
    /// Requests rejected because a lock or connection could not be obtained in time.
    pub static ref LOCK_TIMEOUTS: IntCounter =
        IntCounter::new("lock_timeouts", "Lock or connection timeouts").unwrap();
}

/// Build the metrics middleware, serving `/metrics`.
pub fn build_metrics_handler() -> Result<PrometheusMetrics> {
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .map_err(|e| ServerError::MetricsError {
            message: e.to_string(),
        })?;

    setup_process_metrics(&prometheus)?;

    for counter in [
        &*PULL_REQUESTS_CREATED,
        &*PULL_REQUESTS_MERGED,
        &*REVIEWERS_REASSIGNED,
        &*LOCK_TIMEOUTS,
    ] {
        prometheus
            .registry
            .register(Box::new(counter.clone()))
            .map_err(|e| ServerError::MetricsError {
                message: e.to_string(),
            })?;
    }

    Ok(prometheus)
}

#[cfg(target_os = "linux")]
fn setup_process_metrics(metrics: &PrometheusMetrics) -> Result<()> {
    use prometheus::process_collector::ProcessCollector;

    metrics
        .registry
        .register(Box::new(ProcessCollector::for_self()))
        .map_err(|e| ServerError::MetricsError {
            message: e.to_string(),
        })
}

#[cfg(not(target_os = "linux"))]
fn setup_process_metrics(_metrics: &PrometheusMetrics) -> Result<()> {
    Ok(())
}
