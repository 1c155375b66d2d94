use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder};
use service::registration::Outcome;

// Prometheus metrics (default registry)
pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "signup_registrations_total",
        "Registration attempts by outcome",
        &["outcome"]
    )
    .expect("register registrations_total")
});

pub static REGISTRATION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "signup_registration_duration_seconds",
        "Time spent in the registration service",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register registration_duration")
});

pub fn record_outcome(outcome: &Outcome) {
    REGISTRATIONS_TOTAL.with_label_values(&[outcome.label()]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    // touch the statics so the families show up before the first signup
    Lazy::force(&REGISTRATIONS_TOTAL);
    Lazy::force(&REGISTRATION_DURATION);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
