//! Simulation configuration and its validation.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Which family of inter-event distribution a source or server draws from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DistributionKind {
    /// Fixed inter-event interval (for a source) or service time (for a server).
    Constant,
    /// Exponentially distributed inter-event interval / service time.
    Exponential,
}

/// One arrival source: its diagnostic id and the distribution its arrivals follow.
///
/// `parameter` is the inter-arrival interval for [`DistributionKind::Constant`]
/// and the rate for [`DistributionKind::Exponential`]. Internal identity is
/// this entry's index within [`Configuration::sources`], not `id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub id: u32,
    pub parameter: f64,
    pub distribution_kind: DistributionKind,
}

/// One service station: its diagnostic id and the distribution its service
/// times follow. Same `parameter` semantics as [`SourceSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub id: u32,
    pub parameter: f64,
    pub distribution_kind: DistributionKind,
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub buffer_capacity: usize,
    pub max_arrivals: usize,
    #[serde(default = "Configuration::default_max_time")]
    pub max_time: f64,
    pub seed: u64,
    pub sources: Vec<SourceSpec>,
    pub servers: Vec<ServerSpec>,
}

impl Configuration {
    /// Default horizon when `max_time` is omitted from a deserialized config.
    pub fn default_max_time() -> f64 {
        f64::MAX / 2.0
    }

    /// Validates every field per the configuration error taxonomy.
    ///
    /// All-or-nothing: the first violation found is returned and
    /// construction of a [`crate::Simulator`] is refused.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.sources.is_empty() {
            return Err(SimError::EmptySources);
        }
        if self.servers.is_empty() {
            return Err(SimError::EmptyServers);
        }
        if self.buffer_capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        if self.max_arrivals == 0 {
            return Err(SimError::ZeroArrivalCap);
        }
        if self.max_time <= 0.0 {
            return Err(SimError::NonPositiveParameter {
                role: "max_time",
                index: 0,
            });
        }
        for (index, source) in self.sources.iter().enumerate() {
            if source.parameter <= 0.0 {
                return Err(SimError::NonPositiveParameter {
                    role: "source parameter",
                    index,
                });
            }
        }
        for (index, server) in self.servers.iter().enumerate() {
            if server.parameter <= 0.0 {
                return Err(SimError::NonPositiveParameter {
                    role: "server parameter",
                    index,
                });
            }
        }
        Ok(())
    }
}
