//! Optional queue metrics.
//!
//! With the `metrics` feature enabled these helpers publish through the
//! `metrics` facade; install any recorder (Prometheus, statsd, ...) to
//! collect them. Without the feature they compile to nothing.

/// Counter of items written.
pub const ENQUEUED_TOTAL: &str = "ledgerq_enqueued_total";
/// Counter of items returned to a cursor.
pub const DEQUEUED_TOTAL: &str = "ledgerq_dequeued_total";
/// Counter of dequeues that found nothing new.
pub const EMPTY_TOTAL: &str = "ledgerq_empty_total";
/// Gauge of the newest sequence number.
pub const TAIL: &str = "ledgerq_tail";

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_enqueue(tail: u64) {
    metrics::counter!(ENQUEUED_TOTAL).increment(1);
    metrics::gauge!(TAIL).set(tail as f64);
}

#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub(crate) fn record_enqueue(_tail: u64) {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_dequeue() {
    metrics::counter!(DEQUEUED_TOTAL).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub(crate) fn record_dequeue() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_empty() {
    metrics::counter!(EMPTY_TOTAL).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub(crate) fn record_empty() {}

#[cfg(feature = "metrics")]
#[inline]
pub(crate) fn record_tail(tail: u64) {
    metrics::gauge!(TAIL).set(tail as f64);
}

#[cfg(not(feature = "metrics"))]
#[inline(always)]
pub(crate) fn record_tail(_tail: u64) {}
