//! A host-facing, read-only timeline of every relevant callback.

use std::sync::Mutex;

use crate::observer::{SimEvent, SimObserver};
use crate::request::RequestId;

/// Collects every callback as a [`SimEvent`], in invocation order, for host
/// UIs that want step-by-step inspection without re-deriving it from
/// [`crate::metrics::MetricsObserver`]'s running totals.
#[derive(Debug, Default)]
pub struct TimelineObserver {
    entries: Mutex<Vec<SimEvent>>,
}

impl TimelineObserver {
    pub fn new() -> Self {
        TimelineObserver {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// A read-only snapshot of the timeline recorded so far.
    pub fn entries(&self) -> Vec<SimEvent> {
        self.entries.lock().expect("timeline mutex poisoned").clone()
    }

    fn push(&self, entry: SimEvent) {
        self.entries.lock().expect("timeline mutex poisoned").push(entry);
    }
}

impl SimObserver for TimelineObserver {
    fn on_arrival(&self, time: f64, request_id: RequestId, source_id: usize) {
        self.push(SimEvent::Arrival {
            time,
            request_id,
            source_id,
        });
    }

    fn on_service_start(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
    ) {
        self.push(SimEvent::ServiceStart {
            time,
            request_id,
            source_id,
            server_id,
        });
    }

    fn on_service_end(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
        waiting: f64,
        service: f64,
        time_in_system: f64,
    ) {
        self.push(SimEvent::ServiceEnd {
            time,
            request_id,
            source_id,
            server_id,
            waiting,
            service,
            time_in_system,
        });
    }

    fn on_buffer_place(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        self.push(SimEvent::BufferPlace {
            time,
            request_id,
            source_id,
            buffer_slot,
        });
    }

    fn on_buffer_take(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        self.push(SimEvent::BufferTake {
            time,
            request_id,
            source_id,
            buffer_slot,
        });
    }

    fn on_buffer_displaced(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        self.push(SimEvent::BufferDisplaced {
            time,
            request_id,
            source_id,
            buffer_slot,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let tl = TimelineObserver::new();
        tl.on_arrival(1.0, RequestId(1), 0);
        tl.on_service_start(1.0, RequestId(1), 0, 0);
        let entries = tl.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], SimEvent::Arrival { .. }));
        assert!(matches!(entries[1], SimEvent::ServiceStart { .. }));
    }
}
