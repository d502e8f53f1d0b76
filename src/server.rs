//! A service station.

use crate::distribution::Distribution;
use crate::request::Request;

/// Owns one service [`Distribution`]; holds at most one in-service Request.
#[derive(Debug, Clone)]
pub struct Server {
    pub id: usize,
    distribution: Distribution,
    current: Option<Request>,
    completion_time: Option<f64>,
}

impl Server {
    pub fn new(id: usize, distribution: Distribution) -> Self {
        Server {
            id,
            distribution,
            current: None,
            completion_time: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.completion_time
    }

    /// Begins service on `request`. Precondition: idle. Sets
    /// `service_start` on the request and draws a completion time.
    pub fn start(&mut self, mut request: Request, now: f64) {
        debug_assert!(!self.is_busy(), "server {} started while busy", self.id);
        request.start_service(now);
        let service = self.distribution.sample();
        self.completion_time = Some(now + service);
        self.current = Some(request);
    }

    /// Precondition: busy. Clears busy state and returns the Request.
    /// Does not touch the clock.
    pub fn finish(&mut self) -> Request {
        self.completion_time = None;
        self.current
            .take()
            .unwrap_or_else(|| unreachable!("server {} finished while idle", self.id))
    }
}
