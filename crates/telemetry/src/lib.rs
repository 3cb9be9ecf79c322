//! Process-wide telemetry for the collector.
//!
//! Instruments live from process start to shutdown and are safe for
//! concurrent increment from simultaneously-executing requests. The
//! scrape endpoint renders them in Prometheus text format.

pub mod exposition;
pub mod metrics;
pub mod tracing_setup;

pub use exposition::*;
pub use metrics::*;
pub use tracing_setup::*;
