//! Typed future events and their total order.

use std::cmp::Ordering;

/// A future occurrence on the calendar. Ordering is primary by ascending
/// time; at a tie, `ArrivalDue` precedes `CompletionDue`; further ties break
/// on ascending `source_id`/`server_id`. This three-level order is encoded
/// directly in `Ord` rather than relied upon from container stability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    ArrivalDue { source_id: usize, time: f64 },
    CompletionDue { server_id: usize, time: f64 },
}

impl Event {
    pub fn time(&self) -> f64 {
        match self {
            Event::ArrivalDue { time, .. } => *time,
            Event::CompletionDue { time, .. } => *time,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Event::ArrivalDue { .. } => 0,
            Event::CompletionDue { .. } => 1,
        }
    }

    fn tiebreak_index(&self) -> usize {
        match self {
            Event::ArrivalDue { source_id, .. } => *source_id,
            Event::CompletionDue { server_id, .. } => *server_id,
        }
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time()
            .partial_cmp(&other.time())
            .expect("event time must never be NaN")
            .then_with(|| self.kind_rank().cmp(&other.kind_rank()))
            .then_with(|| self.tiebreak_index().cmp(&other.tiebreak_index()))
    }
}
