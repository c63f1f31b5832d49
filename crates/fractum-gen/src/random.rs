//! Seedable uniform random stream shared by the stochastic generators.
//!
//! Every generator owns its own [`RandomStream`] instead of reaching for a
//! process-wide RNG, so two generators built from the same seed replay the
//! same sequence regardless of what else runs in the process.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

/// A uniform random source backed by ChaCha8.
///
/// The stream is advanced by every draw. Cloning it forks the sequence: the
/// clone and the original produce identical values from that point on.
#[derive(Clone, Debug)]
pub struct RandomStream {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomStream {
    /// Create a reproducible stream from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a stream seeded from the thread-local OS-backed generator.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    /// Use `seed` when present, otherwise fall back to [`RandomStream::from_entropy`].
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// The seed this stream was created from.
    ///
    /// Logged by callers so an unseeded run can be replayed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform value between `lo` and `hi`.
    ///
    /// Computed as `lo + (hi - lo) * unit()`, so `lo == hi` yields `lo` and an
    /// inverted range is sampled mirrored instead of panicking.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform value in `[-1, 1)`.
    #[inline]
    pub fn signed_unit(&mut self) -> f64 {
        self.uniform(-1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}
