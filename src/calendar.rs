//! Binary min-heap of [`Event`]s.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::event::Event;

/// Min-priority set of [`Event`]s keyed on `Event`'s total order.
/// `std::collections::BinaryHeap` is a max-heap, so entries are wrapped in
/// `Reverse`, so no dedicated priority-queue crate is needed for this shape.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    heap: BinaryHeap<Reverse<Event>>,
}

impl Calendar {
    pub fn new() -> Self {
        Calendar {
            heap: BinaryHeap::new(),
        }
    }

    /// Schedules `event`. Scheduling an event strictly before `now` is a
    /// programming error and panics rather than returning a `Result`
    /// (the caller controls every call site).
    pub fn schedule(&mut self, event: Event, now: f64) {
        assert!(
            event.time() >= now,
            "cannot schedule event at {} before current time {}",
            event.time(),
            now
        );
        self.heap.push(Reverse(event));
    }

    /// Pops the earliest-ordered event, or `None` if the calendar is empty.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(event)| event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(event)| event.time())
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
