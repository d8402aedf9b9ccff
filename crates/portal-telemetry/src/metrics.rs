//! Prometheus metrics for the banking portal.
//!
//! Covers:
//! - Order submissions by outcome and latency
//! - Notifications dispatched by kind and source
//! - Host inbox unread count
//! - Remote module availability
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, a programming error that should crash on
//! first use rather than silently drop metrics.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, register_int_gauge,
    CounterVec, Encoder, GaugeVec, HistogramVec, IntGauge, TextEncoder,
};

use crate::error::TelemetryResult;

/// Total order submissions.
/// Labels: outcome (placed/rejected/error/invalid/busy)
pub static ORDER_SUBMISSIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "portal_order_submissions_total",
        "Total order submissions by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Time spent in the submitter per order, in milliseconds.
pub static ORDER_SUBMIT_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "portal_order_submit_latency_ms",
        "Order submission latency in milliseconds",
        &["transaction_type"],
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 1500.0, 2500.0, 5000.0]
    )
    .unwrap()
});

/// Total notifications dispatched.
/// Labels: source (oms/dashboard/core), kind (success/error/warning/info)
pub static NOTIFICATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "portal_notifications_total",
        "Total notifications dispatched",
        &["source", "kind"]
    )
    .unwrap()
});

/// Unread notifications in the host inbox.
pub static INBOX_UNREAD: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "portal_inbox_unread",
        "Unread notifications in the host inbox"
    )
    .unwrap()
});

/// Remote module availability (1 = available).
pub static MODULE_AVAILABLE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "portal_module_available",
        "Remote module availability (1=available)",
        &["module"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record an order submission outcome.
    pub fn order_submission(outcome: &str) {
        ORDER_SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record time spent waiting on the submitter.
    pub fn order_submit_latency(transaction_type: &str, latency_ms: f64) {
        ORDER_SUBMIT_LATENCY_MS
            .with_label_values(&[transaction_type])
            .observe(latency_ms);
    }

    /// Record a dispatched notification.
    pub fn notification(source: &str, kind: &str) {
        NOTIFICATIONS_TOTAL.with_label_values(&[source, kind]).inc();
    }

    /// Set the host inbox unread count.
    pub fn inbox_unread(count: usize) {
        INBOX_UNREAD.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Record a module availability probe result.
    pub fn module_available(module: &str, available: bool) {
        MODULE_AVAILABLE
            .with_label_values(&[module])
            .set(if available { 1.0 } else { 0.0 });
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_submission_counter_increments() {
        let before = ORDER_SUBMISSIONS_TOTAL
            .with_label_values(&["placed"])
            .get();
        Metrics::order_submission("placed");
        let after = ORDER_SUBMISSIONS_TOTAL
            .with_label_values(&["placed"])
            .get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_gather_text_contains_registered_metrics() {
        Metrics::notification("oms", "success");
        Metrics::module_available("oms", true);

        let text = Metrics::gather_text().unwrap();
        assert!(text.contains("portal_notifications_total"));
        assert!(text.contains("portal_module_available"));
    }

    #[test]
    fn test_inbox_unread_gauge() {
        Metrics::inbox_unread(3);
        assert_eq!(INBOX_UNREAD.get(), 3);
    }
}
