//! Prometheus metrics for part lookups.

use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec, TextEncoder};

pub static LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "part_lookup_total",
        "Part lookups by outcome",
        &["outcome"]
    )
    .expect("part_lookup_total is registered once")
});

pub static LOOKUP_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "part_lookup_duration_seconds",
        "Wall-clock time spent on part lookups",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]
    )
    .expect("part_lookup_duration_seconds is registered once")
});

pub fn record_lookup(outcome: &str, seconds: f64) {
    LOOKUPS.with_label_values(&[outcome]).inc();
    LOOKUP_DURATION.observe(seconds);
}

/// Text exposition of the default registry.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}
