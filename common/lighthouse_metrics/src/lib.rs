//! A thin wrapper around `prometheus`: every metric is registered lazily behind a
//! `lazy_static! { pub static ref X: Result<...> = try_create_...(); }`
//! declaration in the owning crate, and `Result` is propagated rather than unwrapped so a
//! duplicate-registration error (most commonly hit in tests that spin up multiple instances of the
//! same component) degrades to a no-op instead of a panic.

pub use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, HistogramTimer, HistogramVec, IntCounter,
    IntCounterVec, IntGauge, IntGaugeVec, Opts, Result, TextEncoder,
};

/// Registers an `IntGauge` with the global default registry, returning `Err` if a metric with
/// this name is already registered rather than panicking.
pub fn try_create_int_gauge(name: &str, help: &str) -> Result<IntGauge> {
    let gauge = IntGauge::new(name, help)?;
    prometheus::register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// As [`try_create_int_gauge`], for metrics that need sub-integer precision (e.g. durations in
/// seconds).
pub fn try_create_float_gauge(name: &str, help: &str) -> Result<Gauge> {
    let gauge = Gauge::new(name, help)?;
    prometheus::register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

pub fn try_create_int_counter_vec(
    name: &str,
    help: &str,
    label_names: &[&str],
) -> Result<IntCounterVec> {
    let counter_vec = IntCounterVec::new(Opts::new(name, help), label_names)?;
    prometheus::register(Box::new(counter_vec.clone()))?;
    Ok(counter_vec)
}

pub fn try_create_histogram_vec(
    name: &str,
    help: &str,
    label_names: &[&str],
) -> Result<HistogramVec> {
    let histogram_vec = HistogramVec::new(HistogramOpts::new(name, help), label_names)?;
    prometheus::register(Box::new(histogram_vec.clone()))?;
    Ok(histogram_vec)
}

/// Starts a timer against the first label combination's histogram, or is a no-op if the metric
/// failed to register. Returned handle records the elapsed duration when dropped.
pub fn start_timer_vec(histogram: &Result<HistogramVec>, label_values: &[&str]) -> Option<HistogramTimer> {
    histogram
        .as_ref()
        .ok()
        .map(|h| h.with_label_values(label_values).start_timer())
}

/// Increments a counter-vec label if the metric registered successfully; silently a no-op
/// otherwise.
pub fn inc_counter_vec(counter: &Result<IntCounterVec>, label_values: &[&str]) {
    if let Ok(counter) = counter {
        counter.with_label_values(label_values).inc();
    }
}

/// Sets a gauge's value if the metric registered successfully; silently a no-op otherwise.
pub fn set_gauge(gauge: &Result<IntGauge>, value: i64) {
    if let Ok(gauge) = gauge {
        gauge.set(value);
    }
}

/// As [`set_gauge`], for a float-valued gauge.
pub fn set_float_gauge(gauge: &Result<Gauge>, value: f64) {
    if let Ok(gauge) = gauge {
        gauge.set(value);
    }
}

/// Renders the global default registry's current state in the Prometheus text exposition format.
pub fn gather_text() -> String {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&metric_families, &mut buffer)
        .unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}
