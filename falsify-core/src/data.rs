//! Core data types for falsify: size, random source and run configuration.

use std::fmt;
use std::time::Duration;

/// Size parameter for controlling test data generation.
///
/// The property driver grows the size across iterations so early samples are
/// small and later ones larger. Size typically ranges from 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Size as a signed bound for integer sampling, saturating at `i64::MAX`.
    pub fn as_bound(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

/// A stream of random words that generators draw from.
///
/// A property run owns exactly one source for its whole lifetime, so a run
/// seeded the same way samples the same values.
pub trait RandomSource {
    /// Produce the next 64 random bits and advance the stream.
    fn next_u64(&mut self) -> u64;

    /// Draw an integer uniformly from the inclusive interval `[lower, upper]`.
    ///
    /// The bounds may be given in either order and may span the whole `i64`
    /// domain.
    fn between(&mut self, lower: i64, upper: i64) -> i64 {
        let (lower, upper) = (lower.min(upper), lower.max(upper));
        let width = (i128::from(upper) - i128::from(lower)) as u128 + 1;
        let word = self.next_u64();
        let offset = if width > u128::from(u64::MAX) {
            u128::from(word)
        } else {
            (u128::from(word) * width) >> 64
        };
        (i128::from(lower) + offset as i128) as i64
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn between(&mut self, lower: i64, upper: i64) -> i64 {
        (**self).between(lower, upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn between(&mut self, lower: i64, upper: i64) -> i64 {
        (**self).between(lower, upper)
    }
}

/// SplitMix64 random stream for deterministic test generation.
///
/// Two seeds built from the same `u64` produce the same stream, which makes
/// failing runs reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Generate the next random value and the advanced seed.
    pub fn next(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Pick a fresh seed value from the thread-local RNG.
    ///
    /// The value is returned rather than the seed so it can be reported and
    /// reused to replay a run.
    pub fn random_value() -> u64 {
        use rand::Rng;
        rand::thread_rng().gen()
    }
}

impl RandomSource for Seed {
    fn next_u64(&mut self) -> u64 {
        let (value, next) = self.next();
        *self = next;
        value
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({}, {})", self.0, self.1)
    }
}

/// Configuration for a property run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of sampling iterations to run.
    pub test_limit: usize,

    /// Maximum number of accepted shrinks before reporting. Unbounded by
    /// default: every shrink search ends on its own.
    pub shrink_limit: usize,

    /// Maximum size parameter to use.
    pub size_limit: usize,

    /// Fixed seed for the run's random stream. `None` picks a fresh one.
    pub seed: Option<u64>,

    /// Wall-clock budget; exceeding it stops the run like a stop request.
    pub time_limit: Option<Duration>,

    /// Abort the run when an observer fails instead of logging and moving on.
    pub propagate_observer_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_limit: 100,
            shrink_limit: usize::MAX,
            size_limit: 100,
            seed: None,
            time_limit: None,
            propagate_observer_errors: false,
        }
    }
}

impl Config {
    /// Create a new config with the given number of tests.
    pub fn with_tests(mut self, tests: usize) -> Self {
        self.test_limit = tests;
        self
    }

    /// Create a new config with the given shrink limit.
    pub fn with_shrinks(mut self, shrinks: usize) -> Self {
        self.shrink_limit = shrinks;
        self
    }

    /// Create a new config with the given size limit.
    pub fn with_size_limit(mut self, size: usize) -> Self {
        self.size_limit = size;
        self
    }

    /// Replay the stream produced by `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stop the run once `limit` has elapsed.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Treat observer failures as fatal to the run.
    pub fn propagating_observer_errors(mut self) -> Self {
        self.propagate_observer_errors = true;
        self
    }

    /// Size used for the 1-based iteration `index`.
    ///
    /// Grows linearly from zero towards `size_limit` and never decreases.
    pub fn size_for(&self, index: usize) -> Size {
        if self.test_limit == 0 {
            return Size::new(0);
        }
        let step = index.saturating_sub(1);
        Size::new(step.saturating_mul(self.size_limit) / self.test_limit)
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generate a good gamma value for SplitMix64.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Ensure gamma is odd for maximal period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}
