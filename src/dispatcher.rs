//! The arrival/completion state machine.

use std::rc::Rc;

use crate::buffer::{Buffer, Full};
use crate::calendar::Calendar;
use crate::event::Event;
use crate::metrics::{Metrics, MetricsObserver};
use crate::observer::SimObserver;
use crate::request::{Request, RequestId};
use crate::server::Server;
use crate::source::Source;

/// Executes the state machine on each popped event; never reads the
/// calendar directly, only schedules successor events into it. Holds the
/// round-robin server-selection cursor shared between the arrival and
/// completion paths.
pub struct Dispatcher {
    metrics: Rc<MetricsObserver>,
    observers: Vec<Rc<dyn SimObserver>>,
    next_server_cursor: usize,
    arrived_count: u64,
}

impl Dispatcher {
    /// Builds a dispatcher with [`MetricsObserver`] pre-registered first,
    /// ahead of any observer the host adds later.
    pub fn new(num_sources: usize, num_servers: usize) -> Self {
        let metrics = Rc::new(MetricsObserver::new(num_sources, num_servers));
        let observers: Vec<Rc<dyn SimObserver>> = vec![metrics.clone()];
        Dispatcher {
            metrics,
            observers,
            next_server_cursor: 0,
            arrived_count: 0,
        }
    }

    /// Registers an additional observer, after `MetricsObserver`, in
    /// registration order.
    pub fn add_observer(&mut self, observer: Rc<dyn SimObserver>) {
        self.observers.push(observer);
    }

    pub fn metrics_snapshot(&self) -> Metrics {
        self.metrics.snapshot()
    }

    pub fn arrived_count(&self) -> u64 {
        self.arrived_count
    }

    fn select_idle_server(&self, servers: &[Server]) -> Option<usize> {
        let n = servers.len();
        (0..n)
            .map(|offset| (self.next_server_cursor + offset) % n)
            .find(|&idx| !servers[idx].is_busy())
    }

    /// Handles an `ArrivalDue(source_id, t)` event.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_arrival(
        &mut self,
        source_id: usize,
        time: f64,
        max_arrivals: u64,
        next_request_id: &mut u64,
        sources: &mut [Source],
        servers: &mut [Server],
        buffer: &mut Buffer,
        calendar: &mut Calendar,
    ) {
        if self.arrived_count >= max_arrivals {
            return;
        }

        let id = RequestId(*next_request_id);
        *next_request_id += 1;
        let request = Request::new(id, source_id, time);
        self.arrived_count += 1;
        self.notify_arrival(time, id, source_id);

        match self.select_idle_server(servers) {
            Some(server_idx) => {
                servers[server_idx].start(request, time);
                self.next_server_cursor = (server_idx + 1) % servers.len();
                self.notify_service_start(time, id, source_id, server_idx);
                let completion_time = servers[server_idx]
                    .completion_time()
                    .expect("server just started, completion time must be set");
                calendar.schedule(
                    Event::CompletionDue {
                        server_id: server_idx,
                        time: completion_time,
                    },
                    time,
                );
            }
            None => match buffer.place(request) {
                Ok(slot) => self.notify_buffer_place(time, id, source_id, slot),
                Err(Full) => {
                    let (evicted, evicted_slot) = buffer
                        .displace_last_placed()
                        .expect("buffer full implies nonempty");
                    self.notify_buffer_displaced(
                        time,
                        evicted.id,
                        evicted.source_id,
                        evicted_slot,
                    );
                    let slot = buffer
                        .place(request)
                        .expect("slot just freed by displacement");
                    self.notify_buffer_place(time, id, source_id, slot);
                }
            },
        }

        if self.arrived_count < max_arrivals {
            let next_time = sources[source_id].schedule_next(time);
            calendar.schedule(Event::ArrivalDue { source_id, time: next_time }, time);
        } else {
            sources[source_id].clear();
        }
    }

    /// Handles a `CompletionDue(server_id, t)` event.
    pub fn handle_completion(
        &mut self,
        server_id: usize,
        time: f64,
        servers: &mut [Server],
        buffer: &mut Buffer,
        calendar: &mut Calendar,
    ) {
        let finished = servers[server_id].finish();
        let service_start = finished
            .service_start
            .expect("a finishing request was always started");
        let waiting = service_start - finished.arrival;
        let service = time - service_start;
        let time_in_system = time - finished.arrival;
        self.notify_service_end(
            time,
            finished.id,
            finished.source_id,
            server_id,
            waiting,
            service,
            time_in_system,
        );

        if let Ok((next_request, slot)) = buffer.take_for_service() {
            self.notify_buffer_take(time, next_request.id, next_request.source_id, slot);
            servers[server_id].start(next_request, time);
            self.next_server_cursor = (server_id + 1) % servers.len();
            self.notify_service_start(time, next_request.id, next_request.source_id, server_id);
            let completion_time = servers[server_id]
                .completion_time()
                .expect("server just started, completion time must be set");
            calendar.schedule(
                Event::CompletionDue {
                    server_id,
                    time: completion_time,
                },
                time,
            );
        }
    }

    fn notify_arrival(&self, time: f64, request_id: RequestId, source_id: usize) {
        for observer in &self.observers {
            observer.on_arrival(time, request_id, source_id);
        }
    }

    fn notify_service_start(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
    ) {
        for observer in &self.observers {
            observer.on_service_start(time, request_id, source_id, server_id);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn notify_service_end(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        server_id: usize,
        waiting: f64,
        service: f64,
        time_in_system: f64,
    ) {
        for observer in &self.observers {
            observer.on_service_end(
                time,
                request_id,
                source_id,
                server_id,
                waiting,
                service,
                time_in_system,
            );
        }
    }

    fn notify_buffer_place(&self, time: f64, request_id: RequestId, source_id: usize, slot: usize) {
        for observer in &self.observers {
            observer.on_buffer_place(time, request_id, source_id, slot);
        }
    }

    fn notify_buffer_take(&self, time: f64, request_id: RequestId, source_id: usize, slot: usize) {
        for observer in &self.observers {
            observer.on_buffer_take(time, request_id, source_id, slot);
        }
    }

    fn notify_buffer_displaced(
        &self,
        time: f64,
        request_id: RequestId,
        source_id: usize,
        slot: usize,
    ) {
        for observer in &self.observers {
            observer.on_buffer_displaced(time, request_id, source_id, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;

    fn one_source_one_server() -> (Vec<Source>, Vec<Server>, Buffer, Calendar) {
        let sources = vec![Source::new(0, Distribution::constant(1.0))];
        let servers = vec![Server::new(0, Distribution::constant(0.5))];
        let buffer = Buffer::new(1);
        let calendar = Calendar::new();
        (sources, servers, buffer, calendar)
    }

    #[test]
    fn arrival_assigns_idle_server_and_schedules_completion() {
        let (mut sources, mut servers, mut buffer, mut calendar) = one_source_one_server();
        let mut dispatcher = Dispatcher::new(1, 1);
        let mut next_id = 0u64;
        dispatcher.handle_arrival(
            0, 1.0, 5, &mut next_id, &mut sources, &mut servers, &mut buffer, &mut calendar,
        );
        assert!(servers[0].is_busy());
        assert_eq!(calendar.size(), 2); // completion + next arrival
        let snap = dispatcher.metrics_snapshot();
        assert_eq!(snap.arrived(), 1);
    }

    #[test]
    fn arrival_cap_stops_further_scheduling() {
        let (mut sources, mut servers, mut buffer, mut calendar) = one_source_one_server();
        let mut dispatcher = Dispatcher::new(1, 1);
        let mut next_id = 0u64;
        dispatcher.handle_arrival(
            0, 1.0, 1, &mut next_id, &mut sources, &mut servers, &mut buffer, &mut calendar,
        );
        assert!(!sources[0].is_active());
        assert_eq!(calendar.size(), 1); // only the completion, no further arrival
    }

    #[test]
    fn completion_pulls_from_buffer() {
        let (mut sources, mut servers, mut buffer, mut calendar) = one_source_one_server();
        let mut dispatcher = Dispatcher::new(1, 1);
        let mut next_id = 0u64;
        // t=1: A1 -> server
        dispatcher.handle_arrival(
            0, 1.0, 5, &mut next_id, &mut sources, &mut servers, &mut buffer, &mut calendar,
        );
        // t=2: A2 -> buffer (server busy until t=1.5)
        dispatcher.handle_arrival(
            0, 2.0, 5, &mut next_id, &mut sources, &mut servers, &mut buffer, &mut calendar,
        );
        assert_eq!(buffer.size(), 1);
        dispatcher.handle_completion(0, 2.5, &mut servers, &mut buffer, &mut calendar);
        assert_eq!(buffer.size(), 0);
        assert!(servers[0].is_busy());
    }
}
