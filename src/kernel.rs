//! Construction, clock, and termination semantics.

use std::rc::Rc;

use crate::buffer::Buffer;
use crate::calendar::Calendar;
use crate::config::{Configuration, DistributionKind};
use crate::dispatcher::Dispatcher;
use crate::distribution::Distribution;
use crate::error::SimError;
use crate::event::Event;
use crate::metrics::Metrics;
use crate::observer::SimObserver;
use crate::server::Server;
use crate::source::Source;

/// Wires every component, seeds initial arrivals, and owns the clock and
/// termination predicate. The only way a host drives a simulation.
pub struct Simulator {
    sources: Vec<Source>,
    servers: Vec<Server>,
    buffer: Buffer,
    calendar: Calendar,
    dispatcher: Dispatcher,
    clock: f64,
    next_request_id: u64,
    max_arrivals: u64,
    max_time: f64,
}

impl Simulator {
    /// Validates `config`, builds Sources and Servers with per-instance
    /// seeds, pre-registers `MetricsObserver`, and enqueues one `ArrivalDue`
    /// per Source at each Source's first sample.
    pub fn new(config: Configuration) -> Result<Self, SimError> {
        config.validate()?;

        let mut sources: Vec<Source> = config
            .sources
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let distribution = match spec.distribution_kind {
                    DistributionKind::Constant => Distribution::constant(spec.parameter),
                    DistributionKind::Exponential => {
                        Distribution::exponential_for_source(spec.parameter, config.seed, i)
                    }
                };
                Source::new(i, distribution)
            })
            .collect();

        let servers: Vec<Server> = config
            .servers
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let distribution = match spec.distribution_kind {
                    DistributionKind::Constant => Distribution::constant(spec.parameter),
                    DistributionKind::Exponential => {
                        Distribution::exponential_for_server(spec.parameter, config.seed, i)
                    }
                };
                Server::new(i, distribution)
            })
            .collect();

        let buffer = Buffer::new(config.buffer_capacity);
        let mut calendar = Calendar::new();
        let dispatcher = Dispatcher::new(sources.len(), servers.len());

        for source in sources.iter_mut() {
            let next_time = source.schedule_next(0.0);
            calendar.schedule(
                Event::ArrivalDue {
                    source_id: source.id,
                    time: next_time,
                },
                0.0,
            );
        }

        Ok(Simulator {
            sources,
            servers,
            buffer,
            calendar,
            dispatcher,
            clock: 0.0,
            next_request_id: 0,
            max_arrivals: config.max_arrivals as u64,
            max_time: config.max_time,
        })
    }

    pub fn current_time(&self) -> f64 {
        self.clock
    }

    pub fn add_observer(&mut self, observer: Rc<dyn SimObserver>) {
        self.dispatcher.add_observer(observer);
    }

    pub fn metrics(&self) -> Metrics {
        self.dispatcher.metrics_snapshot()
    }

    /// Pops and dispatches a single event; a no-op if the calendar is
    /// empty.
    pub fn step(&mut self) {
        let Some(event) = self.calendar.pop_min() else {
            return;
        };
        self.clock = event.time();
        match event {
            Event::ArrivalDue { source_id, time } => {
                self.dispatcher.handle_arrival(
                    source_id,
                    time,
                    self.max_arrivals,
                    &mut self.next_request_id,
                    &mut self.sources,
                    &mut self.servers,
                    &mut self.buffer,
                    &mut self.calendar,
                );
            }
            Event::CompletionDue { server_id, time } => {
                self.dispatcher.handle_completion(
                    server_id,
                    time,
                    &mut self.servers,
                    &mut self.buffer,
                    &mut self.calendar,
                );
            }
        }
    }

    /// Calls `step()` until `finished()`.
    pub fn run(&mut self) {
        while !self.finished() {
            self.step();
        }
    }

    /// `true` iff the clock has exceeded the horizon, or the arrival cap
    /// has been reached and no work remains anywhere in the system.
    pub fn finished(&self) -> bool {
        if self.clock > self.max_time {
            return true;
        }
        let cap_reached = self.dispatcher.arrived_count() >= self.max_arrivals;
        let drained = self.calendar.is_empty() && self.buffer.is_empty();
        let all_idle = self.servers.iter().all(|s| !s.is_busy());
        cap_reached && drained && all_idle
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.size()
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// `false` if `server_id` is out of range (a neutral value, not a panic).
    pub fn server_busy(&self, server_id: usize) -> bool {
        self.servers.get(server_id).map(Server::is_busy).unwrap_or(false)
    }

    /// `None` if `server_id` is out of range or the server is idle.
    pub fn server_next_completion(&self, server_id: usize) -> Option<f64> {
        self.servers.get(server_id).and_then(Server::completion_time)
    }

    /// `false` if `source_id` is out of range (a neutral value, not a panic).
    pub fn source_active(&self, source_id: usize) -> bool {
        self.sources.get(source_id).map(Source::is_active).unwrap_or(false)
    }

    /// `None` if `source_id` is out of range or the source is exhausted.
    pub fn source_next_arrival(&self, source_id: usize) -> Option<f64> {
        self.sources.get(source_id).and_then(Source::next_arrival_time)
    }

    /// Batch form of [`Simulator::server_busy`], grounded on the original's
    /// `DevicePool::get_device_states` returning a full vector in one call.
    pub fn server_states(&self) -> Vec<bool> {
        self.servers.iter().map(Server::is_busy).collect()
    }

    /// Batch form of [`Simulator::source_active`], grounded on the
    /// original's `SourceManager::get_all_source_states`.
    pub fn source_active_states(&self) -> Vec<bool> {
        self.sources.iter().map(Source::is_active).collect()
    }
}
