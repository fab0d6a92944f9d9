//! Prometheus metrics for the mempool and validation pipeline.
//!
//! Gated behind the `metrics` feature; when the feature is off every method
//! on `Metrics` is a no-op so call sites never need a `cfg` of their own.
//! This crate has no HTTP surface of its own — exporting the registry over
//! `/metrics` is the embedding binary's job, not this library's.

#[cfg(feature = "metrics")]
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

#[cfg(feature = "metrics")]
pub struct Metrics {
    registry: Registry,
    pub admitted_total: IntCounter,
    pub rejected_total: IntCounterVec,
    pub evicted_total: IntCounterVec,
    pub pool_size: IntGauge,
    pub pool_bytes: IntGauge,
    pub deferred_cache_size: IntGauge,
    pub check_tx_duration: Histogram,
}

#[cfg(feature = "metrics")]
impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let admitted_total = IntCounter::with_opts(Opts::new(
            "forge_mempool_admitted_total",
            "transactions admitted into the pool",
        ))?;
        let rejected_total = IntCounterVec::new(
            Opts::new("forge_mempool_rejected_total", "transactions rejected at check_tx"),
            &["reason"],
        )?;
        let evicted_total = IntCounterVec::new(
            Opts::new("forge_mempool_evicted_total", "transactions evicted after admission"),
            &["reason"],
        )?;
        let pool_size =
            IntGauge::with_opts(Opts::new("forge_mempool_size", "admitted transaction count"))?;
        let pool_bytes = IntGauge::with_opts(Opts::new(
            "forge_mempool_bytes",
            "total economy-size bytes of admitted transactions",
        ))?;
        let deferred_cache_size = IntGauge::with_opts(Opts::new(
            "forge_mempool_deferred_cache_size",
            "transactions parked in the deferred cache",
        ))?;
        let check_tx_duration = Histogram::with_opts(HistogramOpts::new(
            "forge_mempool_check_tx_duration_seconds",
            "time spent in check_tx, including validation",
        ))?;

        registry.register(Box::new(admitted_total.clone()))?;
        registry.register(Box::new(rejected_total.clone()))?;
        registry.register(Box::new(evicted_total.clone()))?;
        registry.register(Box::new(pool_size.clone()))?;
        registry.register(Box::new(pool_bytes.clone()))?;
        registry.register(Box::new(deferred_cache_size.clone()))?;
        registry.register(Box::new(check_tx_duration.clone()))?;

        Ok(Self {
            registry,
            admitted_total,
            rejected_total,
            evicted_total,
            pool_size,
            pool_bytes,
            deferred_cache_size,
            check_tx_duration,
        })
    }

    pub fn record_admitted(&self) {
        self.admitted_total.inc();
    }

    pub fn record_rejected(&self, reason: &str) {
        self.rejected_total.with_label_values(&[reason]).inc();
    }

    pub fn record_evicted(&self, reason: &str) {
        self.evicted_total.with_label_values(&[reason]).inc();
    }

    pub fn set_pool_size(&self, size: usize) {
        self.pool_size.set(size as i64);
    }

    pub fn set_pool_bytes(&self, bytes: usize) {
        self.pool_bytes.set(bytes as i64);
    }

    pub fn set_deferred_cache_size(&self, size: usize) {
        self.deferred_cache_size.set(size as i64);
    }

    pub fn observe_check_tx_duration(&self, seconds: f64) {
        self.check_tx_duration.observe(seconds);
    }

    /// Renders the registry in Prometheus text exposition format, for an
    /// embedding binary's own `/metrics` handler.
    pub fn gather_text(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        let _ = encoder.encode(&families, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }
}

#[cfg(not(feature = "metrics"))]
pub struct Metrics;

#[cfg(not(feature = "metrics"))]
impl Metrics {
    pub fn new() -> Result<Self, ()> {
        Ok(Self)
    }
    pub fn record_admitted(&self) {}
    pub fn record_rejected(&self, _reason: &str) {}
    pub fn record_evicted(&self, _reason: &str) {}
    pub fn set_pool_size(&self, _size: usize) {}
    pub fn set_pool_bytes(&self, _bytes: usize) {}
    pub fn set_deferred_cache_size(&self, _size: usize) {}
    pub fn observe_check_tx_duration(&self, _seconds: f64) {}
    pub fn gather_text(&self) -> String {
        String::new()
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.admitted_total.get(), 0);
        assert_eq!(metrics.pool_size.get(), 0);
    }

    #[test]
    fn record_admitted_increments_counter() {
        let metrics = Metrics::new().unwrap();
        metrics.record_admitted();
        metrics.record_admitted();
        assert_eq!(metrics.admitted_total.get(), 2);
    }

    #[test]
    fn rejected_total_is_labeled_by_reason() {
        let metrics = Metrics::new().unwrap();
        metrics.record_rejected("stale_nonce");
        metrics.record_rejected("stale_nonce");
        metrics.record_rejected("container_full");
        assert_eq!(metrics.rejected_total.with_label_values(&["stale_nonce"]).get(), 2);
        assert_eq!(metrics.rejected_total.with_label_values(&["container_full"]).get(), 1);
    }

    #[test]
    fn gather_text_includes_registered_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_admitted();
        let text = metrics.gather_text();
        assert!(text.contains("forge_mempool_admitted_total"));
    }
}
