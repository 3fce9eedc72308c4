//! Per-run engine configuration: random seed and worker parallelism.
//!
//! Every algorithm receives its configuration explicitly, so concurrent runs
//! with different seeds or thread counts never observe each other's settings.
//! Random streams are derived from the seed and a caller-chosen stream index,
//! which keeps results independent of how work is scheduled across workers.
//!
//! A run may carry a worker tag. Every thread of a pool built for that run
//! reports the tag through [`current_worker_tag`], which lets a host attribute
//! a panic raised on a worker to the invocation that started it.

use std::{cell::Cell, env, num::NonZeroUsize, sync::Arc, thread};

use rand::{SeedableRng, rngs::SmallRng};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{EngineError, Result};

/// Environment variable that sets the worker count for engine runs.
pub const THREADS_ENV: &str = "GRAPHKIT_THREADS";

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 1;

/// SplitMix64 increment (the 64-bit golden ratio) used for stream derivation.
const STREAM_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

thread_local! {
    static WORKER_TAG: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Returns the tag of the run whose pool owns the current thread, or `None`
/// outside tagged pools.
#[must_use]
pub fn current_worker_tag() -> Option<u64> {
    WORKER_TAG.with(Cell::get)
}

#[inline]
fn mix_stream_seed(base_seed: u64, stream: u64) -> u64 {
    splitmix64(base_seed ^ stream.wrapping_add(1).wrapping_mul(STREAM_SEED_SPACING))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(STREAM_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Seed and parallelism for a single algorithm run.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use graphkit_engine::RunConfig;
/// use rand::Rng;
///
/// let config = RunConfig::new(7).with_threads(NonZeroUsize::MIN);
/// let first: u64 = config.rng_for(3).r#gen();
/// let again: u64 = config.rng_for(3).r#gen();
/// assert_eq!(first, again);
/// assert_eq!(config.threads().get(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    seed: u64,
    threads: NonZeroUsize,
    worker_tag: Option<u64>,
}

impl RunConfig {
    /// Creates a configuration using every available CPU.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            threads: default_threads(),
            worker_tag: None,
        }
    }

    /// Creates a configuration whose worker count comes from
    /// [`THREADS_ENV`], falling back to the available parallelism.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidThreadCount`] when the variable is set to
    /// something other than a positive integer.
    pub fn from_env(seed: u64) -> Result<Self> {
        let threads = match env::var(THREADS_ENV) {
            Ok(raw) => parse_threads(&raw)?,
            Err(env::VarError::NotPresent) => default_threads(),
            Err(env::VarError::NotUnicode(raw)) => {
                return Err(EngineError::InvalidThreadCount {
                    value: Arc::from(raw.to_string_lossy().as_ref()),
                });
            }
        };
        Ok(Self {
            seed,
            threads,
            worker_tag: None,
        })
    }

    /// Overrides the worker count.
    #[must_use]
    pub fn with_threads(mut self, threads: NonZeroUsize) -> Self {
        self.threads = threads;
        self
    }

    /// Tags the worker threads of pools built for this run.
    #[must_use]
    pub fn with_worker_tag(mut self, tag: u64) -> Self {
        self.worker_tag = Some(tag);
        self
    }

    /// Returns the base seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }

    /// Returns the worker count.
    #[must_use]
    #[rustfmt::skip]
    pub fn threads(&self) -> NonZeroUsize { self.threads }

    /// Returns the worker tag, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn worker_tag(&self) -> Option<u64> { self.worker_tag }

    /// Returns a generator for the numbered random stream `stream`.
    ///
    /// Streams with the same index and seed always produce the same sequence.
    #[must_use]
    pub fn rng_for(&self, stream: u64) -> SmallRng {
        SmallRng::seed_from_u64(mix_stream_seed(self.seed, stream))
    }

    /// Builds a worker pool sized for this run. The pool is owned by the
    /// caller and shut down when dropped.
    ///
    /// # Errors
    /// Returns [`EngineError::ThreadPool`] when the pool cannot be created.
    pub fn thread_pool(&self) -> Result<ThreadPool> {
        let tag = self.worker_tag;
        ThreadPoolBuilder::new()
            .num_threads(self.threads.get())
            .thread_name(|index| format!("graphkit-worker-{index}"))
            .start_handler(move |_| WORKER_TAG.with(|slot| slot.set(tag)))
            .build()
            .map_err(|error| EngineError::ThreadPool {
                message: Arc::from(error.to_string()),
            })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Parses a worker count as accepted by [`THREADS_ENV`].
///
/// # Errors
/// Returns [`EngineError::InvalidThreadCount`] unless `raw` is a positive
/// integer (surrounding whitespace is ignored).
pub fn parse_threads(raw: &str) -> Result<NonZeroUsize> {
    raw.trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| EngineError::InvalidThreadCount {
            value: Arc::from(raw),
        })
}

fn default_threads() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
