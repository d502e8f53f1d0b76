//! Request identity and timestamps.

/// Stable identifier assigned by the owning [`crate::Simulator`]'s counter
/// field, never a `static`/`thread_local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// An arrival moving through the network.
///
/// `service_start` is `None` until a [`crate::server::Server`] begins
/// serving it; invariant: once set, `service_start >= arrival`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub id: RequestId,
    pub source_id: usize,
    pub arrival: f64,
    pub service_start: Option<f64>,
}

impl Request {
    pub fn new(id: RequestId, source_id: usize, arrival: f64) -> Self {
        Request {
            id,
            source_id,
            arrival,
            service_start: None,
        }
    }

    /// Records the start of service. Panics if called twice or with a time
    /// before arrival, a programming error rather than a recoverable one.
    pub fn start_service(&mut self, now: f64) {
        debug_assert!(
            self.service_start.is_none(),
            "service_start set twice for {:?}",
            self.id
        );
        debug_assert!(
            now >= self.arrival,
            "service cannot start before arrival for {:?}",
            self.id
        );
        self.service_start = Some(now);
    }
}
