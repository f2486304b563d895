//! Telemetry metric name constants.
//!
//! Centralised metric names for vordr operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vordr_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation` — pipeline stage (e.g. "classify", "embed", "similarity")
//! - `status` — outcome: "ok" or "error"
//! - `signal` — degraded signal name: "translation", "context", "language_detection"

/// Total classification calls.
///
/// Labels: `status` ("ok" | "error").
pub const CLASSIFY_TOTAL: &str = "vordr_classify_total";

/// Classification call duration in seconds.
pub const CLASSIFY_DURATION_SECONDS: &str = "vordr_classify_duration_seconds";

/// Total degraded-signal fallbacks taken.
///
/// Labels: `signal` ("translation" | "context" | "language_detection").
pub const DEGRADED_SIGNALS_TOTAL: &str = "vordr_degraded_signals_total";

/// Total embedding cache hits.
pub const CACHE_HITS_TOTAL: &str = "vordr_cache_hits_total";

/// Total embedding cache misses.
pub const CACHE_MISSES_TOTAL: &str = "vordr_cache_misses_total";
