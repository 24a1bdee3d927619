//! Prometheus metrics for the recompute pipeline.
//!
//! Metrics are registered lazily on first access using once_cell::Lazy.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

/// Duration of each recompute stage (compile, filter, facets, range)
pub static RECOMPUTE_STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "leadlens_recompute_stage_duration_seconds",
        "Recompute stage duration in seconds",
        &["stage"],
        // Buckets: 0.1ms .. 1s
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register recompute stage duration histogram")
});

/// Recomputations that exceeded the configured slow threshold
pub static SLOW_RECOMPUTES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "leadlens_slow_recomputes_total",
        "Total number of recomputations slower than the configured threshold"
    )
    .expect("Failed to register slow recompute counter")
});

/// Matcher cache lookups by result (hit/miss)
pub static MATCHER_CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "leadlens_matcher_cache_lookups_total",
        "Total number of compiled matcher cache lookups",
        &["result"]
    )
    .expect("Failed to register matcher cache lookup counter")
});
