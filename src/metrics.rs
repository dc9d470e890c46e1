//! Prometheus counters for fetches and extraction.
//!
//! Counters are no-ops until [`init_metrics`] installs the recorder, so the
//! library can be used (and tested) without it.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

pub const FETCH_ATTEMPTS: &str = "catalog_fetch_attempts_total";
pub const FETCH_RETRIES: &str = "catalog_fetch_retries_total";
pub const FETCH_FAILURES: &str = "catalog_fetch_failures_total";
pub const RECORDS_EXTRACTED: &str = "catalog_records_extracted_total";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Idempotent; returns the render handle, or
/// `None` when another recorder is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            let _ = ::metrics::counter!(FETCH_ATTEMPTS);
            let _ = ::metrics::counter!(FETCH_RETRIES);
            let _ = ::metrics::counter!(FETCH_FAILURES);
            let _ = ::metrics::counter!(RECORDS_EXTRACTED);
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

pub fn record_fetch_attempt() {
    ::metrics::counter!(FETCH_ATTEMPTS).increment(1);
}

pub fn record_fetch_retry() {
    ::metrics::counter!(FETCH_RETRIES).increment(1);
}

pub fn record_fetch_failure() {
    ::metrics::counter!(FETCH_FAILURES).increment(1);
}

pub fn record_extracted(count: usize) {
    ::metrics::counter!(RECORDS_EXTRACTED).increment(count as u64);
}
