use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

use crate::models::{BonusKind, Resolution, SummaryStatus};

lazy_static! {
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_sessions_total",
        "Total number of quiz sessions by lifecycle status",
        &["status"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "quiz_sessions_active",
        "Number of quiz sessions awaiting answers"
    )
    .unwrap();

    pub static ref ANSWERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_answers_total",
        "Total number of resolved questions",
        &["outcome"]
    )
    .unwrap();

    pub static ref RESPONSE_SECONDS: Histogram = register_histogram!(
        "quiz_response_seconds",
        "Seconds taken to resolve a question",
        vec![1.0, 2.5, 5.0, 10.0, 15.0, 30.0, 45.0, 60.0, 90.0, 120.0]
    )
    .unwrap();

    pub static ref BONUSES_GRANTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_bonuses_granted_total",
        "Total number of bonuses granted",
        &["kind"]
    )
    .unwrap();

    pub static ref LIVES_LOST_TOTAL: IntCounter = register_int_counter!(
        "quiz_lives_lost_total",
        "Total number of lives lost"
    )
    .unwrap();

    pub static ref SECOND_CHANCES_USED_TOTAL: IntCounter = register_int_counter!(
        "quiz_second_chances_used_total",
        "Total number of life losses absorbed by a second chance"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

pub fn record_session_started() {
    SESSIONS_TOTAL.with_label_values(&["started"]).inc();
    SESSIONS_ACTIVE.inc();
}

pub fn record_session_finished(status: SummaryStatus) {
    SESSIONS_TOTAL.with_label_values(&[status.as_str()]).inc();
    SESSIONS_ACTIVE.dec();
}

pub fn record_resolution(resolution: Resolution, response_seconds: u32) {
    ANSWERS_TOTAL
        .with_label_values(&[resolution.as_str()])
        .inc();
    RESPONSE_SECONDS.observe(f64::from(response_seconds));
}

pub fn record_bonus(kind: BonusKind) {
    BONUSES_GRANTED_TOTAL
        .with_label_values(&[kind.as_str()])
        .inc();
}
