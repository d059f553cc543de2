//! Prometheus metrics for outbound API calls.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Counters and timings for API operations
#[derive(Clone)]
pub struct ApiMetrics {
    pub registry: Registry,
    /// API calls by operation and outcome
    pub api_requests_total: CounterVec,
    /// API call duration by operation
    pub api_request_duration_seconds: HistogramVec,
}

impl ApiMetrics {
    /// Create a collector with its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let api_requests_total = CounterVec::new(
            Opts::new("pipeline_api_requests_total", "Total pipeline API calls by operation and outcome"),
            &["operation", "outcome"],
        )?;

        let api_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "pipeline_api_request_duration_seconds",
                "Pipeline API call duration in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["operation"],
        )?;

        registry.register(Box::new(api_requests_total.clone()))?;
        registry.register(Box::new(api_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            api_requests_total,
            api_request_duration_seconds,
        })
    }

    /// Record one finished call
    pub fn record(&self, operation: &str, outcome: &str, duration: Duration) {
        self.api_requests_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.api_request_duration_seconds
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    pub fn count(&self, operation: &str, outcome: &str) -> u64 {
        self.api_requests_total
            .with_label_values(&[operation, outcome])
            .get() as u64
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_render() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.record("list_deals", "success", Duration::from_millis(12));
        metrics.record("list_deals", "success", Duration::from_millis(8));
        metrics.record("list_deals", "http_error", Duration::from_millis(3));

        assert_eq!(metrics.count("list_deals", "success"), 2);
        assert_eq!(metrics.count("list_deals", "http_error"), 1);

        let text = metrics.render().unwrap();
        assert!(text.contains("pipeline_api_requests_total"));
        assert!(text.contains("operation=\"list_deals\""));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        assert!(ApiMetrics::with_registry(registry.clone()).is_ok());
        assert!(ApiMetrics::with_registry(registry).is_err());
    }
}
