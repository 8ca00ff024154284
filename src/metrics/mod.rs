//! Prometheus metrics for the toast engine.
//!
//! - Toasts created, labelled by variant (custom variants share one label)
//! - Exits started, labelled by cause
//! - Active toasts currently held by any `ToastCenter`

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder,
};

use crate::notification::Variant;

/// Prefix for all metrics
const METRIC_PREFIX: &str = "toast";

lazy_static! {
    /// Total toasts created by variant
    pub static ref TOASTS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_created_total", METRIC_PREFIX),
        "Total toasts created",
        &["variant"]
    ).unwrap();

    /// Total exits started by cause
    pub static ref TOASTS_EXITED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_exited_total", METRIC_PREFIX),
        "Total toasts that entered the exit phase",
        &["cause"]
    ).unwrap();

    /// Toasts currently in a collection
    pub static ref TOASTS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_active", METRIC_PREFIX),
        "Number of toasts currently held"
    ).unwrap();
}

/// Why a toast started its exit phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCause {
    /// User or caller dismissed it
    Dismissed,
    /// Its duration elapsed
    Expired,
    /// Pushed out by the per-position visibility cap
    Overflow,
}

impl ExitCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitCause::Dismissed => "dismissed",
            ExitCause::Expired => "expired",
            ExitCause::Overflow => "overflow",
        }
    }
}

/// Helper struct for recording toast metrics
pub struct ToastMetrics;

impl ToastMetrics {
    /// Record a new toast
    pub fn record_created(variant: &Variant) {
        let label = if variant.is_custom() { "custom" } else { variant.as_str() };
        TOASTS_CREATED_TOTAL.with_label_values(&[label]).inc();
        TOASTS_ACTIVE.inc();
    }

    /// Record the start of an exit
    pub fn record_exit(cause: ExitCause) {
        TOASTS_EXITED_TOTAL.with_label_values(&[cause.as_str()]).inc();
    }

    /// Record a purge from the collection
    pub fn record_removed() {
        TOASTS_ACTIVE.dec();
    }

    /// Release toasts still held when their center is dropped
    pub fn record_released(count: usize) {
        TOASTS_ACTIVE.sub(count as i64);
    }
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
