//! A discrete-event simulator for a finite-capacity, multi-source,
//! multi-server queueing network with a displacement-based
//! (last-arrived-replaces) overflow discipline.
//!
//! The crate's single entry point is [`Simulator`]: build one from a
//! validated [`Configuration`], drive it with [`Simulator::step`] or
//! [`Simulator::run`], and read [`Simulator::metrics`] or register an
//! observer (e.g. [`TimelineObserver`]) to watch it unfold.

pub mod buffer;
pub mod calendar;
pub mod config;
pub mod dispatcher;
pub mod distribution;
pub mod error;
pub mod event;
pub mod kernel;
pub mod metrics;
pub mod observer;
pub mod request;
pub mod server;
pub mod source;
pub mod timeline;

pub use buffer::Buffer;
pub use calendar::Calendar;
pub use config::{Configuration, DistributionKind, ServerSpec, SourceSpec};
pub use distribution::Distribution;
pub use error::SimError;
pub use event::Event;
pub use kernel::Simulator;
pub use metrics::{Metrics, MetricsObserver, SourceStats};
pub use observer::{CollectingObserver, NullObserver, SimEvent, SimObserver, TracingObserver};
pub use request::{Request, RequestId};
pub use server::Server;
pub use source::Source;
pub use timeline::TimelineObserver;
