//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Classification (outcomes, LLM latency and tokens)
//! - Crisis escalation and dispatch

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Classification
// =============================================================================

/// Classification attempts by result.
pub static CLASSIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "relief_classifications_total",
            "Total free-text classification attempts",
        ),
        &["result"], // "success", "service_error", "decode_error"
    )
    .unwrap()
});

/// LLM request latency by provider.
pub static LLM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relief_llm_request_duration_seconds",
            "Duration of LLM completion requests",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["provider"],
    )
    .unwrap()
});

/// LLM tokens used.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relief_llm_tokens_total", "Total LLM tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Crisis
// =============================================================================

/// Crisis escalations triggered.
pub static ESCALATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "relief_escalations_total",
        "Total crisis escalations triggered",
    )
    .unwrap()
});

/// Entries moved into crisis mode.
pub static ENTRIES_ESCALATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "relief_entries_escalated_total",
        "Total entries transitioned by crisis escalation",
    )
    .unwrap()
});

/// Dispatch attempts by outcome.
pub static DISPATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relief_dispatches_total", "Total simulated dispatches"),
        &["status"], // "dispatched", "no_truck_available", "insufficient_stock"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CLASSIFICATIONS_TOTAL.clone()),
        Box::new(LLM_REQUEST_DURATION.clone()),
        Box::new(LLM_TOKENS.clone()),
        Box::new(ESCALATIONS_TOTAL.clone()),
        Box::new(ENTRIES_ESCALATED.clone()),
        Box::new(DISPATCHES_TOTAL.clone()),
    ]
}
