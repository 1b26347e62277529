//! Explicit logging sink passed by the coordinator to each component, rather
//! than an ambient global logger, so test code can inject a capturing sink.

use std::sync::Mutex;

/// A structured event emitted by a planning component. Kept as a flat enum
/// rather than a format string so a `CapturingSink` can assert on it in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ClusterProximityWarning { cluster_id: usize, meters: f64 },
    DegenerateHop { meters: f64 },
    RetryingRequest { attempt: u32, reason: String },
    RateLimited { backoff_ms: u64 },
    ScenarioFailed { k: usize, reason: String },
    ScenarioMeasured { k: usize, seconds: f64, meters: f64 },
    PlausibilityWarning { detail: String },
    Degraded { reason: String },
    CancelledPartial { best_k: usize },
}

pub trait Sink: Send + Sync {
    fn info(&self, event: Event);
    fn warn(&self, event: Event);
    fn error(&self, event: Event);
}

/// Production adapter: forwards events onto the `tracing` subscriber
/// installed in `main.rs`, funneled through one place.
#[derive(Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn info(&self, event: Event) {
        tracing::info!(?event, "planning event");
    }

    fn warn(&self, event: Event) {
        tracing::warn!(?event, "planning event");
    }

    fn error(&self, event: Event) {
        tracing::error!(?event, "planning event");
    }
}

/// Test adapter: records events instead of writing them anywhere, so tests
/// can assert a warning fired without capturing stdout.
#[derive(Default)]
pub struct CapturingSink {
    events: Mutex<Vec<(&'static str, Event)>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(&'static str, Event)> {
        self.events.lock().unwrap().clone()
    }
}

impl Sink for CapturingSink {
    fn info(&self, event: Event) {
        self.events.lock().unwrap().push(("info", event));
    }

    fn warn(&self, event: Event) {
        self.events.lock().unwrap().push(("warn", event));
    }

    fn error(&self, event: Event) {
        self.events.lock().unwrap().push(("error", event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_sink_records_events() {
        let sink = CapturingSink::new();
        sink.warn(Event::DegenerateHop { meters: 3.0 });
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "warn");
    }
}
