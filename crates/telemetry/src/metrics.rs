//! Metric instruments.
//!
//! Plain atomics behind label maps; no external metrics runtime. Families
//! are fixed at construction and the registry is a process-wide static.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use parking_lot::RwLock;

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking, in milliseconds.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub const BUCKET_BOUNDS_MS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds. Values beyond the last bound count
    /// only toward sum/count (the +Inf bucket at exposition time).
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS_MS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum_ms(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    /// Per-bucket (non-cumulative) counts, paired with their bounds.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS_MS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// A counter family keyed by label values.
#[derive(Debug)]
pub struct CounterVec {
    label_names: &'static [&'static str],
    series: RwLock<HashMap<Vec<String>, Counter>>,
}

impl CounterVec {
    pub fn new(label_names: &'static [&'static str]) -> Self {
        Self {
            label_names,
            series: RwLock::new(HashMap::new()),
        }
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.label_names
    }

    /// Increments the series for `labels`, creating it on first use.
    pub fn inc(&self, labels: &[&str]) {
        debug_assert_eq!(labels.len(), self.label_names.len());
        let key: Vec<String> = labels.iter().map(|s| s.to_string()).collect();

        if let Some(counter) = self.series.read().get(&key) {
            counter.inc();
            return;
        }
        self.series.write().entry(key).or_default().inc();
    }

    pub fn get(&self, labels: &[&str]) -> u64 {
        let key: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        self.series.read().get(&key).map(Counter::get).unwrap_or(0)
    }

    /// Sorted snapshot of all series, for stable exposition output.
    pub fn snapshot(&self) -> Vec<(Vec<String>, u64)> {
        let mut series: Vec<_> = self
            .series
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.get()))
            .collect();
        series.sort();
        series
    }
}

/// Snapshot of one histogram series.
#[derive(Debug, Clone)]
pub struct HistogramSnapshot {
    pub labels: Vec<String>,
    /// Non-cumulative bucket counts paired with their ms bounds.
    pub buckets: Vec<(u64, u64)>,
    pub sum_ms: u64,
    pub count: u64,
}

/// A histogram family keyed by label values.
#[derive(Debug)]
pub struct HistogramVec {
    label_names: &'static [&'static str],
    series: RwLock<HashMap<Vec<String>, Histogram>>,
}

impl HistogramVec {
    pub fn new(label_names: &'static [&'static str]) -> Self {
        Self {
            label_names,
            series: RwLock::new(HashMap::new()),
        }
    }

    pub fn label_names(&self) -> &'static [&'static str] {
        self.label_names
    }

    /// Records a millisecond observation for `labels`.
    pub fn observe(&self, labels: &[&str], ms: u64) {
        debug_assert_eq!(labels.len(), self.label_names.len());
        let key: Vec<String> = labels.iter().map(|s| s.to_string()).collect();

        if let Some(histogram) = self.series.read().get(&key) {
            histogram.observe(ms);
            return;
        }
        self.series.write().entry(key).or_default().observe(ms);
    }

    pub fn count(&self, labels: &[&str]) -> u64 {
        let key: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        self.series
            .read()
            .get(&key)
            .map(Histogram::count)
            .unwrap_or(0)
    }

    /// Sorted snapshot of all series.
    pub fn snapshot(&self) -> Vec<HistogramSnapshot> {
        let mut series: Vec<_> = self
            .series
            .read()
            .iter()
            .map(|(labels, h)| HistogramSnapshot {
                labels: labels.clone(),
                buckets: h.buckets(),
                sum_ms: h.sum_ms(),
                count: h.count(),
            })
            .collect();
        series.sort_by(|a, b| a.labels.cmp(&b.labels));
        series
    }
}

/// Collected metrics for the collector service.
#[derive(Debug)]
pub struct Metrics {
    /// Events accepted, by event type and client name.
    pub events_total: CounterVec,
    /// Request latency, by endpoint.
    pub request_duration: HistogramVec,
    /// Failures, by category: `auth_missing`, `auth_invalid`, `validation`,
    /// `processing`.
    pub errors_total: CounterVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            events_total: CounterVec::new(&["event_type", "client"]),
            request_duration: HistogramVec::new(&["endpoint"]),
            errors_total: CounterVec::new(&["type"]),
        }
    }
}

/// Global metrics registry; lifecycle is process start to shutdown.
pub static METRICS: LazyLock<Metrics> = LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
