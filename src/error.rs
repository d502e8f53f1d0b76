use thiserror::Error;

/// Configuration errors surfaced at [`crate::Simulator::new`].
///
/// Programming errors (scheduling into the past, starting a busy server,
/// finishing an idle server, taking from an empty buffer) are not
/// represented here: they are invariants the kernel maintains internally
/// and are surfaced as panics at the violating call site, not as results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("configuration has no sources")]
    EmptySources,

    #[error("configuration has no servers")]
    EmptyServers,

    #[error("{role} at index {index} must be strictly positive")]
    NonPositiveParameter { role: &'static str, index: usize },

    #[error("buffer_capacity must be at least 1")]
    ZeroCapacity,

    #[error("max_arrivals must be at least 1")]
    ZeroArrivalCap,
}
