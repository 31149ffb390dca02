//! Metrics and observability utilities
//!
//! Prometheus metrics through the `metrics` facade with a shared prefix.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Circle Classroom metrics
pub const METRICS_PREFIX: &str = "circle";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Buckets for language model calls (vision extraction is slow)
pub const AI_BUCKETS: &[f64] = &[
    0.250,
    0.500,
    1.000,
    2.000,
    5.000,
    10.00,
    20.00,
    30.00,
    60.00,
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Classroom writes
    describe_counter!(
        format!("{}_attendance_saves_total", METRICS_PREFIX),
        Unit::Count,
        "Attendance sheets saved"
    );

    describe_counter!(
        format!("{}_attendance_marks_total", METRICS_PREFIX),
        Unit::Count,
        "Student attendance marks written"
    );

    describe_counter!(
        format!("{}_grade_saves_total", METRICS_PREFIX),
        Unit::Count,
        "Assignment grade sheets saved"
    );

    describe_counter!(
        format!("{}_grades_written_total", METRICS_PREFIX),
        Unit::Count,
        "Individual grades written"
    );

    // Portal
    describe_counter!(
        format!("{}_student_logins_total", METRICS_PREFIX),
        Unit::Count,
        "Student portal login attempts by outcome"
    );

    // Language model
    describe_counter!(
        format!("{}_ai_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Language model calls by kind and outcome"
    );

    describe_histogram!(
        format!("{}_ai_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Language model call latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_attendance_save(marks: usize) {
    counter!(format!("{}_attendance_saves_total", METRICS_PREFIX)).increment(1);
    counter!(format!("{}_attendance_marks_total", METRICS_PREFIX)).increment(marks as u64);
}

pub fn record_grade_save(grades: usize) {
    counter!(format!("{}_grade_saves_total", METRICS_PREFIX)).increment(1);
    counter!(format!("{}_grades_written_total", METRICS_PREFIX)).increment(grades as u64);
}

/// `outcome` is one of success, invalid, rate_limited
pub fn record_student_login(outcome: &'static str) {
    counter!(
        format!("{}_student_logins_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

/// Helper to record language model metrics
pub fn record_ai_call(kind: &'static str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_ai_requests_total", METRICS_PREFIX),
        "kind" => kind,
        "status" => status
    )
    .increment(1);

    if success {
        histogram!(
            format!("{}_ai_duration_seconds", METRICS_PREFIX),
            "kind" => kind
        )
        .record(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_sorted() {
        for buckets in [LATENCY_BUCKETS, AI_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: calls are no-ops
        let metrics = RequestMetrics::start("GET", "/dashboard");
        metrics.finish(200);
        record_attendance_save(3);
        record_grade_save(2);
        record_student_login("invalid");
        record_ai_call("analyze", 0.5, true);
    }
}
