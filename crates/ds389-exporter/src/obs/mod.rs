//! In-process metrics and logging setup.
//!
//! Metrics are stored as atomics and rendered by the metrics route in the
//! Prometheus text exposition format.

pub mod logging;
pub mod metrics;

pub use metrics::ExporterMetrics;
