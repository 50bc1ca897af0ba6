use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec, TextEncoder,
};

pub static NOTIFICATIONS_CREATED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "social_notifications_created_total",
        "Notifications appended to the store, by type",
        &["type"]
    )
    .expect("metric registration")
});

pub static NOTIFICATIONS_SUPPRESSED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "social_notifications_suppressed_total",
        "Events that produced no notification (self-actions)"
    )
    .expect("metric registration")
});

pub static RELAY_DELIVERIES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "social_relay_deliveries_total",
        "Notifications successfully pushed to the realtime channel"
    )
    .expect("metric registration")
});

pub static RELAY_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "social_relay_failures_total",
        "Relay pushes dropped after a failed attempt"
    )
    .expect("metric registration")
});

/// Render the default registry in the Prometheus text format.
pub fn render() -> String {
    let metric_families = prometheus::gather();
    TextEncoder::new()
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render() {
        NOTIFICATIONS_CREATED.with_label_values(&["follow"]).inc();
        NOTIFICATIONS_SUPPRESSED.inc();
        let out = render();
        assert!(out.contains("social_notifications_created_total"));
        assert!(out.contains("social_notifications_suppressed_total"));
    }
}
