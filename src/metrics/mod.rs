use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::HistogramOpts;
use prometheus::HistogramVec;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::warn;


lazy_static! {
    pub static ref CACHE_LOOKUP_COUNTER: IntCounterVec = IntCounterVec::new(
        Opts::new("recognition_cache_lookups", "Result cache lookups by outcome"),
        &["dispatcher", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref CACHE_EVICTION_COUNTER: IntCounterVec = IntCounterVec::new(
        Opts::new("recognition_cache_evictions", "Results evicted from the cache"),
        &["dispatcher"]
    )
    .expect("metric can not be created");

    pub static ref SETTINGS_APPLIED_COUNTER: IntCounterVec = IntCounterVec::new(
        Opts::new("recognition_settings_applied", "Settings handed to the algorithm"),
        &["dispatcher"]
    )
    .expect("metric can not be created");

    pub static ref RECOGNITION_FAILURE_COUNTER: IntCounterVec = IntCounterVec::new(
        Opts::new("recognition_failures", "Inputs the algorithm failed to process"),
        &["dispatcher"]
    )
    .expect("metric can not be created");

    pub static ref RECOGNITION_DURATION_METRIC: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "recognition_compute_duration_ms",
            "Histogram of algorithm compute duration in ms"
        )
        .buckets(exponential_buckets(1.0, 2.0, 12).expect("valid buckets")),
        &["dispatcher"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER: Once = Once::new();

fn register_custom_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(CACHE_LOOKUP_COUNTER.clone()),
            Box::new(CACHE_EVICTION_COUNTER.clone()),
            Box::new(SETTINGS_APPLIED_COUNTER.clone()),
            Box::new(RECOGNITION_FAILURE_COUNTER.clone()),
            Box::new(RECOGNITION_DURATION_METRIC.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                warn!("collector can not be registered: {:?}", e);
            }
        }
    });
}

/// Renders every recognition metric in the prometheus text format.
pub fn gather_metrics() -> String {
    register_custom_metrics();

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode metrics: {:?}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
