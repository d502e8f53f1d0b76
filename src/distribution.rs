//! Per-instance seeded random streams.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution as _, Exp};

/// Distinguishes a source's stream from a server's stream so that a source
/// and a server sharing an index never draw from the same seed.
const SOURCE_KIND_TAG: u64 = 0;
const SERVER_KIND_TAG: u64 = 1;

/// Derives a per-instance seed from the configuration's base seed, a
/// source/server kind tag, and the owning component's index.
///
/// Fixed mixing step; not cryptographic, only required to decorrelate
/// streams that share a base seed, so that adding or removing one source
/// does not perturb another's stream.
fn derive_seed(base_seed: u64, kind_tag: u64, index: usize) -> u64 {
    base_seed ^ (kind_tag << 32) ^ (index as u64)
}

/// A nonnegative-sample generator owned exclusively by one Source or Server.
///
/// `Constant` is stateless; `Exponential` owns its own [`ChaCha8Rng`], chosen
/// over the default `StdRng` because `StdRng`'s algorithm is unspecified
/// across `rand` releases and this crate's determinism invariant requires a
/// generator whose bit sequence is stable forever, not just within one
/// dependency version.
#[derive(Debug, Clone)]
pub enum Distribution {
    Constant(f64),
    Exponential { rate: f64, rng: ChaCha8Rng },
}

impl Distribution {
    /// Builds a `Constant` distribution. `value` must be strictly positive;
    /// validated by [`crate::config::Configuration::validate`], not here.
    pub fn constant(value: f64) -> Self {
        Distribution::Constant(value)
    }

    /// Builds an `Exponential` distribution seeded for a source at `index`.
    pub fn exponential_for_source(rate: f64, base_seed: u64, index: usize) -> Self {
        Self::exponential(rate, derive_seed(base_seed, SOURCE_KIND_TAG, index))
    }

    /// Builds an `Exponential` distribution seeded for a server at `index`.
    pub fn exponential_for_server(rate: f64, base_seed: u64, index: usize) -> Self {
        Self::exponential(rate, derive_seed(base_seed, SERVER_KIND_TAG, index))
    }

    fn exponential(rate: f64, seed: u64) -> Self {
        Distribution::Exponential {
            rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws one nonnegative sample, advancing internal state for
    /// `Exponential`.
    pub fn sample(&mut self) -> f64 {
        match self {
            Distribution::Constant(c) => *c,
            Distribution::Exponential { rate, rng } => {
                let exp = Exp::new(*rate).expect("rate validated strictly positive");
                exp.sample(rng)
            }
        }
    }
}
