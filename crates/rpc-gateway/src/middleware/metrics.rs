//! Dispatcher counters, exposed as JSON on `GET /metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::error::{codes, ApiError};

/// Gateway request metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Errors by JSON-RPC code
    pub parse_errors: AtomicU64,
    pub invalid_requests: AtomicU64,
    pub method_not_found: AtomicU64,
    pub invalid_params: AtomicU64,
    pub resource_not_found: AtomicU64,
    pub internal_errors: AtomicU64,

    /// Handler panics caught by the dispatcher (also counted as internal errors)
    pub handler_panics: AtomicU64,

    // Latency tracking (simplified - in production use histograms)
    pub total_latency_us: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request. `error` is `None` on success.
    pub fn record_request(&self, error: Option<&ApiError>, latency_us: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        match error {
            None => {
                self.requests_success.fetch_add(1, Ordering::Relaxed);
            }
            Some(err) => {
                self.requests_error.fetch_add(1, Ordering::Relaxed);
                self.error_counter(err.code).fetch_add(1, Ordering::Relaxed);
            }
        }

        self.total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_panic(&self) {
        self.handler_panics.fetch_add(1, Ordering::Relaxed);
    }

    fn error_counter(&self, code: i32) -> &AtomicU64 {
        match code {
            codes::PARSE_ERROR => &self.parse_errors,
            codes::INVALID_REQUEST => &self.invalid_requests,
            codes::METHOD_NOT_FOUND => &self.method_not_found,
            codes::INVALID_PARAMS => &self.invalid_params,
            codes::RESOURCE_NOT_FOUND => &self.resource_not_found,
            _ => &self.internal_errors,
        }
    }

    /// Get average latency in microseconds
    pub fn average_latency_us(&self) -> f64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
            },
            "errors": {
                "parse_error": self.parse_errors.load(Ordering::Relaxed),
                "invalid_request": self.invalid_requests.load(Ordering::Relaxed),
                "method_not_found": self.method_not_found.load(Ordering::Relaxed),
                "invalid_params": self.invalid_params.load(Ordering::Relaxed),
                "resource_not_found": self.resource_not_found.load(Ordering::Relaxed),
                "internal_error": self.internal_errors.load(Ordering::Relaxed),
                "handler_panics": self.handler_panics.load(Ordering::Relaxed),
            },
            "latency": {
                "average_us": self.average_latency_us(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self, error: Option<&ApiError>) {
        let latency_us = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.metrics.record_request(error, latency_us);
    }
}
