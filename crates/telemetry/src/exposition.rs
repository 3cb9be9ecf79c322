//! Prometheus text-format rendering.
//!
//! Internally latencies are tracked in milliseconds; the exposition
//! converts bounds and sums to seconds as the family name promises.

use std::fmt::Write as _;

use crate::metrics::{metrics, CounterVec, HistogramVec, Metrics};

/// Content type for the scrape endpoint.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Renders the global registry.
pub fn render() -> String {
    render_metrics(metrics())
}

/// Renders a specific registry (tests).
pub fn render_metrics(m: &Metrics) -> String {
    let mut out = String::new();
    write_counter_family(
        &mut out,
        "events_total",
        "Total events received",
        &m.events_total,
    );
    write_histogram_family(
        &mut out,
        "request_duration_seconds",
        "Request duration",
        &m.request_duration,
    );
    write_counter_family(&mut out, "errors_total", "Total errors", &m.errors_total);
    out
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_labels(names: &[&str], values: &[String]) -> String {
    let pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
        .collect();
    pairs.join(",")
}

fn write_counter_family(out: &mut String, name: &str, help: &str, family: &CounterVec) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} counter");
    for (labels, value) in family.snapshot() {
        let labels = format_labels(family.label_names(), &labels);
        let _ = writeln!(out, "{name}{{{labels}}} {value}");
    }
}

fn write_histogram_family(out: &mut String, name: &str, help: &str, family: &HistogramVec) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} histogram");
    for series in family.snapshot() {
        let labels = format_labels(family.label_names(), &series.labels);

        // Prometheus buckets are cumulative.
        let mut cumulative = 0u64;
        for (bound_ms, count) in &series.buckets {
            cumulative += count;
            let le = *bound_ms as f64 / 1000.0;
            let _ = writeln!(out, "{name}_bucket{{{labels},le=\"{le}\"}} {cumulative}");
        }
        let _ = writeln!(
            out,
            "{name}_bucket{{{labels},le=\"+Inf\"}} {}",
            series.count
        );
        let _ = writeln!(
            out,
            "{name}_sum{{{labels}}} {}",
            series.sum_ms as f64 / 1000.0
        );
        let _ = writeln!(out, "{name}_count{{{labels}}} {}", series.count);
    }
}
