//! Per-route metrics: counters and gauge, and Prometheus text rendering.

use std::sync::atomic::{AtomicU64, Ordering};

/// The four metric series tracked for a single route.
///
/// Each cell is an independent atomic so reads (from the metrics endpoint)
/// and writes (from the Forwarder) never tear and never need a lock.
#[derive(Debug, Default)]
pub struct RouteMetrics {
    request_count: AtomicU64,
    successful_request_count: AtomicU64,
    failed_request_count: AtomicU64,
    last_response_time: AtomicU64,
}

impl RouteMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, elapsed_ms: u64) {
        self.successful_request_count.fetch_add(1, Ordering::Relaxed);
        self.last_response_time.store(elapsed_ms, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn successful_request_count(&self) -> u64 {
        self.successful_request_count.load(Ordering::Relaxed)
    }

    pub fn failed_request_count(&self) -> u64 {
        self.failed_request_count.load(Ordering::Relaxed)
    }

    pub fn last_response_time(&self) -> u64 {
        self.last_response_time.load(Ordering::Relaxed)
    }
}

/// A named route's metrics, for rendering purposes.
pub struct NamedRouteMetrics<'a> {
    pub name: &'a str,
    pub metrics: &'a RouteMetrics,
}

/// Holds one [`RouteMetrics`] per configured route, indexed in parallel
/// with the route table. There is no `HashMap` or time-series storage:
/// the set of routes is fixed at startup and never grows.
#[derive(Debug)]
pub struct MetricsRegistry {
    per_route: Vec<RouteMetrics>,
}

impl MetricsRegistry {
    /// Builds a registry with one zeroed [`RouteMetrics`] per route.
    pub fn new(route_count: usize) -> Self {
        let per_route = (0..route_count).map(|_| RouteMetrics::new()).collect();
        Self { per_route }
    }

    pub fn route(&self, index: usize) -> &RouteMetrics {
        &self.per_route[index]
    }

    /// Renders every route's metrics as Prometheus exposition text, in
    /// config order, with series ordered per route: request_count,
    /// last_response_time, successful_request_count, failed_request_count.
    pub fn render(&self, route_names: &[String]) -> String {
        let mut out = String::new();
        for (name, metrics) in route_names.iter().zip(self.per_route.iter()) {
            render_route(&mut out, name, metrics);
        }
        out
    }
}

fn render_route(out: &mut String, name: &str, metrics: &RouteMetrics) {
    use std::fmt::Write;
    let _ = writeln!(out, "{}_request_count {}", name, metrics.request_count());
    let _ = writeln!(
        out,
        "{}_last_response_time {}",
        name,
        metrics.last_response_time()
    );
    let _ = writeln!(
        out,
        "{}_successful_request_count {}",
        name,
        metrics.successful_request_count()
    );
    let _ = writeln!(
        out,
        "{}_failed_request_count {}",
        name,
        metrics.failed_request_count()
    );
}
