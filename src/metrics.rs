//! Always-first observer; accumulates totals, sums, and sums-of-squares.

use std::cell::RefCell;

use crate::observer::SimObserver;
use crate::request::RequestId;

/// Per-source summary bundling arrivals, refusal probability, and the
/// waiting/service/time-in-system means and variances into one value,
/// rather than one getter call per field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceStats {
    pub arrivals: u64,
    pub refusal_probability: f64,
    pub mean_waiting: f64,
    pub variance_waiting: f64,
    pub mean_service: f64,
    pub variance_service: f64,
    pub mean_time_in_system: f64,
}

/// Point-in-time snapshot of everything [`MetricsObserver`] has
/// accumulated. Cheap to clone; returned by value from
/// [`crate::kernel::Simulator::metrics`].
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    arrived: u64,
    refused: u64,
    completed: u64,
    sum_time_in_system: f64,
    sum_waiting: f64,
    sum_service: f64,
    server_busy_time: Vec<f64>,
    source_arrivals: Vec<u64>,
    source_refusals: Vec<u64>,
    source_completions: Vec<u64>,
    source_sum_waiting: Vec<f64>,
    source_sum_sq_waiting: Vec<f64>,
    source_sum_service: Vec<f64>,
    source_sum_sq_service: Vec<f64>,
    source_sum_time_in_system: Vec<f64>,
}

impl Metrics {
    fn new(num_sources: usize, num_servers: usize) -> Self {
        Metrics {
            server_busy_time: vec![0.0; num_servers],
            source_arrivals: vec![0; num_sources],
            source_refusals: vec![0; num_sources],
            source_completions: vec![0; num_sources],
            source_sum_waiting: vec![0.0; num_sources],
            source_sum_sq_waiting: vec![0.0; num_sources],
            source_sum_service: vec![0.0; num_sources],
            source_sum_sq_service: vec![0.0; num_sources],
            source_sum_time_in_system: vec![0.0; num_sources],
            ..Default::default()
        }
    }

    pub fn arrived(&self) -> u64 {
        self.arrived
    }

    pub fn refused(&self) -> u64 {
        self.refused
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn refusal_probability(&self) -> f64 {
        if self.arrived == 0 {
            0.0
        } else {
            self.refused as f64 / self.arrived as f64
        }
    }

    pub fn avg_time_in_system(&self) -> f64 {
        mean(self.sum_time_in_system, self.completed)
    }

    pub fn avg_waiting_time(&self) -> f64 {
        mean(self.sum_waiting, self.completed)
    }

    pub fn avg_service_time(&self) -> f64 {
        mean(self.sum_service, self.completed)
    }

    /// `0.0` if `horizon <= 0` or `server_id` is out of range: out-of-range
    /// queries return a neutral value, never an error.
    pub fn server_utilization(&self, server_id: usize, horizon: f64) -> f64 {
        if horizon <= 0.0 {
            return 0.0;
        }
        self.server_busy_time
            .get(server_id)
            .map(|busy| busy / horizon)
            .unwrap_or(0.0)
    }

    /// The raw busy-time accumulator behind [`Metrics::server_utilization`],
    /// for hosts computing utilization against a horizon the kernel does
    /// not itself know. `0.0` if `server_id` is out of range.
    pub fn server_busy_time(&self, server_id: usize) -> f64 {
        self.server_busy_time.get(server_id).copied().unwrap_or(0.0)
    }

    /// `None` if `source_id` is out of range.
    pub fn source_stats(&self, source_id: usize) -> Option<SourceStats> {
        let arrivals = *self.source_arrivals.get(source_id)?;
        let refusals = *self.source_refusals.get(source_id)?;
        let completions = *self.source_completions.get(source_id)?;
        let sum_waiting = self.source_sum_waiting[source_id];
        let sum_sq_waiting = self.source_sum_sq_waiting[source_id];
        let sum_service = self.source_sum_service[source_id];
        let sum_sq_service = self.source_sum_sq_service[source_id];
        let sum_time_in_system = self.source_sum_time_in_system[source_id];

        let refusal_probability = if arrivals == 0 {
            0.0
        } else {
            refusals as f64 / arrivals as f64
        };
        let mean_waiting = mean(sum_waiting, completions);
        let mean_service = mean(sum_service, completions);
        Some(SourceStats {
            arrivals,
            refusal_probability,
            mean_waiting,
            variance_waiting: variance(sum_waiting, sum_sq_waiting, completions),
            mean_service,
            variance_service: variance(sum_service, sum_sq_service, completions),
            mean_time_in_system: mean(sum_time_in_system, completions),
        })
    }
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Var = E[X^2] - (E[X])^2.
fn variance(sum: f64, sum_sq: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    let mean_x = sum / n;
    let mean_x_sq = sum_sq / n;
    (mean_x_sq - mean_x * mean_x).max(0.0)
}

/// Registered first on every [`crate::dispatcher::Dispatcher`], ahead of
/// any observer the host adds later.
#[derive(Debug)]
pub struct MetricsObserver {
    inner: RefCell<Metrics>,
}

impl MetricsObserver {
    pub fn new(num_sources: usize, num_servers: usize) -> Self {
        MetricsObserver {
            inner: RefCell::new(Metrics::new(num_sources, num_servers)),
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner.borrow().clone()
    }
}

impl SimObserver for MetricsObserver {
    fn on_arrival(&self, _time: f64, _request_id: RequestId, source_id: usize) {
        let mut m = self.inner.borrow_mut();
        m.arrived += 1;
        if let Some(count) = m.source_arrivals.get_mut(source_id) {
            *count += 1;
        }
    }

    fn on_buffer_displaced(
        &self,
        _time: f64,
        _request_id: RequestId,
        source_id: usize,
        _buffer_slot: usize,
    ) {
        let mut m = self.inner.borrow_mut();
        m.refused += 1;
        if let Some(count) = m.source_refusals.get_mut(source_id) {
            *count += 1;
        }
    }

    fn on_refusal(&self, time: f64, request_id: RequestId, source_id: usize) {
        // Reserved path; identical accounting to displacement.
        self.on_buffer_displaced(time, request_id, source_id, 0);
    }

    fn on_service_end(
        &self,
        _time: f64,
        _request_id: RequestId,
        source_id: usize,
        server_id: usize,
        waiting: f64,
        service: f64,
        time_in_system: f64,
    ) {
        let mut m = self.inner.borrow_mut();
        m.completed += 1;
        m.sum_time_in_system += time_in_system;
        m.sum_waiting += waiting;
        m.sum_service += service;
        if let Some(busy) = m.server_busy_time.get_mut(server_id) {
            *busy += service;
        }
        if let Some(count) = m.source_completions.get_mut(source_id) {
            *count += 1;
        }
        if let Some(v) = m.source_sum_waiting.get_mut(source_id) {
            *v += waiting;
        }
        if let Some(v) = m.source_sum_sq_waiting.get_mut(source_id) {
            *v += waiting * waiting;
        }
        if let Some(v) = m.source_sum_service.get_mut(source_id) {
            *v += service;
        }
        if let Some(v) = m.source_sum_sq_service.get_mut(source_id) {
            *v += service * service;
        }
        if let Some(v) = m.source_sum_time_in_system.get_mut(source_id) {
            *v += time_in_system;
        }
    }
}
