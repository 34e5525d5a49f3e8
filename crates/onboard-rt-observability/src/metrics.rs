//! OpenTelemetry metrics helpers.
//!
//! Instruments are created lazily on the global meter; without an installed provider
//! they are no-ops.

use opentelemetry::metrics::{Counter, Histogram};
use opentelemetry::{KeyValue, global};
use std::sync::OnceLock;
use std::time::Duration;

const METER_NAME: &str = "onboard_rt";

static A2A_REQUEST_COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
static A2A_REQUEST_HISTOGRAM: OnceLock<Histogram<f64>> = OnceLock::new();
static A2A_ERROR_COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
static TASK_OUTCOME_COUNTER: OnceLock<Counter<u64>> = OnceLock::new();
static STREAM_CHUNK_COUNTER: OnceLock<Counter<u64>> = OnceLock::new();

fn a2a_request_counter() -> &'static Counter<u64> {
    A2A_REQUEST_COUNTER.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_counter("onboard_rt.a2a.request_total")
            .init()
    })
}

fn a2a_request_histogram() -> &'static Histogram<f64> {
    A2A_REQUEST_HISTOGRAM.get_or_init(|| {
        global::meter(METER_NAME)
            .f64_histogram("onboard_rt.a2a.request_duration_ms")
            .init()
    })
}

fn a2a_error_counter() -> &'static Counter<u64> {
    A2A_ERROR_COUNTER.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_counter("onboard_rt.a2a.error_total")
            .init()
    })
}

fn task_outcome_counter() -> &'static Counter<u64> {
    TASK_OUTCOME_COUNTER.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_counter("onboard_rt.task.outcome_total")
            .init()
    })
}

fn stream_chunk_counter() -> &'static Counter<u64> {
    STREAM_CHUNK_COUNTER.get_or_init(|| {
        global::meter(METER_NAME)
            .u64_counter("onboard_rt.stream.chunk_total")
            .init()
    })
}

/// Record completion of an A2A request.
pub fn record_a2a_request(method: &str, result: &str, is_stream: bool, duration: Duration) {
    let attributes = &[
        KeyValue::new("method", method.to_string()),
        KeyValue::new("result", result.to_string()),
        KeyValue::new("stream", is_stream.to_string()),
    ];

    a2a_request_counter().add(1, attributes);
    a2a_request_histogram().record(duration.as_millis() as f64, attributes);
}

/// Record an A2A error by type.
pub fn record_a2a_error(method: &str, error_type: &str) {
    let attributes = &[
        KeyValue::new("method", method.to_string()),
        KeyValue::new("error_type", error_type.to_string()),
    ];
    a2a_error_counter().add(1, attributes);
}

/// Record the terminal state a task reached.
pub fn record_task_outcome(workflow: &str, state: &str) {
    let attributes = &[
        KeyValue::new("workflow", workflow.to_string()),
        KeyValue::new("state", state.to_string()),
    ];
    task_outcome_counter().add(1, attributes);
}

/// Record the number of content chunks written to a stream.
pub fn record_stream_chunks(transport: &str, chunk_count: usize) {
    let attributes = &[KeyValue::new("transport", transport.to_string())];
    stream_chunk_counter().add(chunk_count as u64, attributes);
}
