//! Combinatorial prime counting.
//!
//! Computes π(x), the number of primes ≤ x, with the Deléglise–Rivat
//! method and Gourdon-style refinements: the identity
//!
//! ```text
//! pi(x) = S1 + S2 + pi(y) - 1 - P2(x, y)
//! ```
//!
//! decomposes the count into the ordinary-leaves sum S1, the
//! special-leaves sum S2 over an O(x^{2/3}) domain, and the two-prime
//! term P2, with y = α·x^{1/3} chosen by the α tuning rule.
//!
//! # Architecture
//!
//! - `stdx`: integer math, 240-integer bit windows, the Fenwick counter
//!   tree and the relaxed-atomic dynamic scheduler.
//! - `tables`: one-shot generators (primes, lpf, μ) and the dense /
//!   segmented π oracles.
//! - `phi`: the partial sieve function φ(x, a) with its tiny closed form
//!   and the per-thread multi-layer cache.
//! - `deleglise_rivat`, `gourdon`: the special-leaf engines and the π(x)
//!   composers (sequential, parallel, 128-bit, Gourdon-core).
//! - `classic`: Legendre, Meissel, Lehmer, LMO reference algorithms.
//! - `s1`, `p2`, `sieve`, `progress`: the collaborator terms, the
//!   segment sieve and the stderr progress channel.
//!
//! # Correctness invariants
//!
//! - Every algorithm returns the same π(x); the integration suite checks
//!   them against each other and against sieve counts.
//! - Results are deterministic for any thread count: parallel regions
//!   reduce by integer addition over dynamically scheduled, independent
//!   iterations.
//! - All tables are built before a parallel region and never mutated
//!   inside one.
//!
//! # Example
//!
//! ```
//! assert_eq!(primepi::pi(100), 25);
//! assert_eq!(primepi::phi(1000, 8, 1), 170);
//! ```

pub mod classic;
pub mod deleglise_rivat;
pub mod gourdon;
pub mod p2;
pub mod phi;
pub mod progress;
pub mod s1;
pub mod sieve;
pub mod stdx;
pub mod tables;

pub use classic::{pi_legendre, pi_lehmer, pi_lmo, pi_meissel};
pub use deleglise_rivat::{pi_deleglise_rivat1, pi_deleglise_rivat2, pi_deleglise_rivat3};
pub use gourdon::{ac, pi_gourdon};
pub use phi::{phi, phi_print};

use progress::Progress;

/// Largest x the 128-bit entry points accept.
///
/// Beyond this the α/y/z derivation and the quotient promotions are no
/// longer guaranteed to stay in range.
pub const MAX_PI_X: i128 = 100_000_000_000_000_000_000_000_000; // 10^26

/// Below this bound every algorithm falls back to a direct sieve count,
/// keeping the combinatorial machinery out of degenerate parameter
/// corners.
pub(crate) const SIEVE_FLOOR: i64 = 100;

/// Dispatch bound of [`pi`]: below it a plain sieve count is faster than
/// building any tables.
const SIMPLE_PI_THRESHOLD: i64 = 100_000;

// ============================================================================
// Errors
// ============================================================================

/// Errors reported by the checked entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// x exceeds the supported ceiling.
    InputTooLarge { x: i128, limit: i128 },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputTooLarge { x, limit } => {
                write!(f, "pi(x): x = {x} exceeds the supported ceiling {limit}")
            }
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning knobs of a π(x) computation.
#[derive(Clone, Debug)]
pub struct PiConfig {
    /// Worker threads for the parallel regions.
    pub threads: usize,
    /// Print percentage lines to stderr from a single thread.
    pub print_progress: bool,
}

impl Default for PiConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            print_progress: false,
        }
    }
}

impl PiConfig {
    /// Validates the configuration.
    ///
    /// # Panics
    ///
    /// Panics when `threads` is zero.
    pub fn validate(&self) {
        assert!(self.threads > 0, "threads must be > 0");
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Caps the thread count so that each thread has at least `threshold`
/// work to do; tiny inputs run single-threaded.
pub(crate) fn ideal_num_threads(threads: usize, limit: i64, threshold: i64) -> usize {
    let per_thread = threshold.max(1);
    let max_useful = (limit / per_thread).max(1);
    threads.clamp(1, max_useful.min(usize::MAX as i64) as usize)
}

// ============================================================================
// Entry points
// ============================================================================

/// π(x): the number of primes ≤ x. Negative x counts zero primes.
///
/// Uses all available hardware threads; see [`pi_with_threads`] and
/// [`pi_with_config`] for control.
pub fn pi(x: i64) -> i64 {
    pi_with_threads(x, default_threads())
}

/// π(x) on a bounded thread pool.
pub fn pi_with_threads(x: i64, threads: usize) -> i64 {
    if x < SIMPLE_PI_THRESHOLD {
        return tables::count_primes(x);
    }
    deleglise_rivat::pi_deleglise_rivat2(x, threads)
}

/// π(x) with explicit configuration.
pub fn pi_with_config(x: i64, config: &PiConfig) -> i64 {
    config.validate();
    if x < SIMPLE_PI_THRESHOLD {
        return tables::count_primes(x);
    }
    let progress = Progress::new(config.print_progress);
    deleglise_rivat::pi_dr64(x, config.threads, &progress)
}

/// π(x) for 128-bit x. Rejects x above [`MAX_PI_X`].
pub fn pi_128(x: i128) -> Result<i128, Error> {
    if x <= i64::MAX as i128 {
        return Ok(pi(x as i64) as i128);
    }
    deleglise_rivat::pi_deleglise_rivat3(x)
}

// ============================================================================
// Algorithm selector
// ============================================================================

/// The available π(x) algorithms. All produce identical results and
/// differ only in speed and memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Algorithm {
    Legendre,
    Meissel,
    Lehmer,
    Lmo,
    /// Deléglise–Rivat, sequential.
    DelegliseRivat1,
    /// Deléglise–Rivat, parallel.
    DelegliseRivat2,
    /// Deléglise–Rivat, 128-bit arithmetic path.
    DelegliseRivat3,
    Gourdon,
}

/// π(x) with an explicit algorithm choice.
pub fn pi_with(algorithm: Algorithm, x: i64, threads: usize) -> i64 {
    match algorithm {
        Algorithm::Legendre => classic::pi_legendre(x, threads),
        Algorithm::Meissel => classic::pi_meissel(x, threads),
        Algorithm::Lehmer => classic::pi_lehmer(x, threads),
        Algorithm::Lmo => classic::pi_lmo(x, threads),
        Algorithm::DelegliseRivat1 => deleglise_rivat::pi_deleglise_rivat1(x),
        Algorithm::DelegliseRivat2 => deleglise_rivat::pi_deleglise_rivat2(x, threads),
        Algorithm::DelegliseRivat3 => {
            // i64 inputs are always below the 128-bit ceiling.
            deleglise_rivat::pi_deleglise_rivat3(x as i128).expect("i64 input within ceiling") as i64
        }
        Algorithm::Gourdon => gourdon::pi_gourdon(x, threads),
    }
}
