//! Observer fan-out: the capability-set trait and three ready-made
//! implementations.

use std::sync::Mutex;

use crate::request::RequestId;

/// Owned record of one observer callback invocation, used by observers that
/// need to retain a trace rather than react immediately
/// ([`CollectingObserver`], [`crate::timeline::TimelineObserver`]). Every
/// variant carries at minimum `time`, `request_id`, and `source_id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Arrival {
        time: f64,
        request_id: RequestId,
        source_id: usize,
    },
    ServiceStart {
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
    },
    ServiceEnd {
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
        waiting: f64,
        service: f64,
        time_in_system: f64,
    },
    BufferPlace {
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    },
    BufferTake {
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    },
    BufferDisplaced {
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    },
    Refusal {
        time: f64,
        request_id: RequestId,
        source_id: usize,
    },
}

/// Capability set a [`crate::dispatcher::Dispatcher`] broadcasts to. Every
/// method defaults to a no-op so an observer implements only what it uses.
/// Observers are invoked synchronously, in registration order, and must not
/// mutate Dispatcher state, only their own.
pub trait SimObserver {
    fn on_arrival(&self, _time: f64, _request_id: RequestId, _source_id: usize) {}

    fn on_service_start(
        &self,
        _time: f64,
        _request_id: RequestId,
        _source_id: usize,
        _server_id: usize,
    ) {
    }

    fn on_service_end(
        &self,
        _time: f64,
        _request_id: RequestId,
        _source_id: usize,
        _server_id: usize,
        _waiting: f64,
        _service: f64,
        _time_in_system: f64,
    ) {
    }

    fn on_buffer_place(
        &self,
        _time: f64,
        _request_id: RequestId,
        _source_id: usize,
        _buffer_slot: usize,
    ) {
    }

    fn on_buffer_take(
        &self,
        _time: f64,
        _request_id: RequestId,
        _source_id: usize,
        _buffer_slot: usize,
    ) {
    }

    fn on_buffer_displaced(
        &self,
        _time: f64,
        _request_id: RequestId,
        _source_id: usize,
        _buffer_slot: usize,
    ) {
    }

    /// Reserved: not emitted by the current dispatcher (the only refusal
    /// path is displacement, which emits `on_buffer_displaced`).
    fn on_refusal(&self, _time: f64, _request_id: RequestId, _source_id: usize) {}
}

/// Implements none of the trait's methods. Exists for documentation and
/// benchmarking use, since the default no-op bodies already make it
/// equivalent to omitting an observer entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SimObserver for NullObserver {}

/// Logs every callback at `debug` level (`warn` for refusal paths).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_arrival(&self, time: f64, request_id: RequestId, source_id: usize) {
        tracing::debug!(?time, ?request_id, source_id, "arrival");
    }

    fn on_service_start(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
    ) {
        tracing::debug!(?time, ?request_id, source_id, server_id, "service_start");
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
        tracing::debug!(
            ?time,
            ?request_id,
            source_id,
            server_id,
            waiting,
            service,
            time_in_system,
            "service_end"
        );
    }

    fn on_buffer_place(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        tracing::debug!(?time, ?request_id, source_id, buffer_slot, "buffer_place");
    }

    fn on_buffer_take(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        tracing::debug!(?time, ?request_id, source_id, buffer_slot, "buffer_take");
    }

    fn on_buffer_displaced(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        buffer_slot: usize,
    ) {
        tracing::warn!(
            ?time,
            ?request_id,
            source_id,
            buffer_slot,
            "buffer_displaced"
        );
    }

    fn on_refusal(&self, time: f64, request_id: RequestId, source_id: usize) {
        tracing::warn!(?time, ?request_id, source_id, "refusal");
    }
}

/// Appends every callback, as an owned [`SimEvent`], to an internally
/// mutexed `Vec`, for test assertions on exact callback sequences.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<SimEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        CollectingObserver {
            events: Mutex::new(Vec::new()),
        }
    }

    /// A snapshot of every callback received so far, in invocation order.
    pub fn events(&self) -> Vec<SimEvent> {
        self.events
            .lock()
            .expect("collecting observer mutex poisoned")
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .expect("collecting observer mutex poisoned")
            .clear();
    }

    fn push(&self, event: SimEvent) {
        self.events
            .lock()
            .expect("collecting observer mutex poisoned")
            .push(event);
    }
}

impl SimObserver for CollectingObserver {
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

    fn on_refusal(&self, time: f64, request_id: RequestId, source_id: usize) {
        self.push(SimEvent::Refusal {
            time,
            request_id,
            source_id,
        });
    }
}
