//! Coordinator metrics
//!
//! Recorded through the `metrics` facade; the server installs the Prometheus
//! exporter. Without an installed recorder these calls are no-ops.

use metrics::{counter, histogram};

/// Zero-initialize series so they show up before the first event
pub fn register_default_metrics() {
    for kind in ["created", "edited", "deleted"] {
        for outcome in ["posted", "updated", "removed", "skipped", "failed"] {
            counter!("slack_translator_events_total", "kind" => kind, "outcome" => outcome).absolute(0);
        }
    }

    histogram!("slack_translator_translation_duration_seconds").record(0.0);

    for error_type in ["detection", "translation", "destination", "store", "timeout", "contract"] {
        counter!("slack_translator_errors_total", "type" => error_type).absolute(0);
    }
}

/// Record a handled event
pub fn record_event(kind: &'static str, outcome: &'static str) {
    counter!("slack_translator_events_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// Record time spent in the translation backend
pub fn record_translation_latency(duration_secs: f64) {
    histogram!("slack_translator_translation_duration_seconds").record(duration_secs);
}

/// Record error by type
pub fn record_error(error_type: &'static str) {
    counter!("slack_translator_errors_total", "type" => error_type).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_helpers() {
        // These should not panic
        register_default_metrics();
        record_event("created", "posted");
        record_translation_latency(0.2);
        record_error("translation");
    }
}
