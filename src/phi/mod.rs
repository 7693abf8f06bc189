//! The partial sieve function φ(x, a) (Legendre's sum).
//!
//! φ(x, a) counts the integers in [1, x] that are divisible by none of
//! the first a primes. [`phi`] is the public driver: it screens the
//! degenerate ranges, picks the right evaluation strategy (closed form,
//! π-lookup identity, deferral to π(x), or the cached recursion), and
//! fans the top-level decomposition out over threads, each with its own
//! [`PhiCache`].

pub mod cache;
pub mod tiny;

pub use cache::PhiCache;

use crate::progress;
use crate::stdx::dynamic_schedule::parallel_sum;
use crate::stdx::imath::isqrt;
use crate::tables::generate_n_primes;
use crate::tables::pi_table::PiTable;

/// π(x) <= pix_upper(x): x / (ln x − 1.1) + 10 for x >= 10.
///
/// A cheap overestimate, good enough to route very large a without
/// building a π table.
pub(crate) fn pix_upper(x: i64) -> i64 {
    if x <= 10 {
        return 4;
    }
    let pix = x as f64 / ((x as f64).ln() - 1.1);
    pix as i64 + 10
}

/// For a > π(√x) there is a much faster route: every survivor of the
/// first a primes is either 1 or a prime in (p_a, x], so
/// φ(x, a) = π(x) − a + 1 (or 1 when a ≥ π(x)).
///
/// Must only be called with a strictly greater than π(√x): pi(x) itself
/// evaluates φ at a = π(√x), and dispatching that case here would
/// recurse forever.
fn phi_pix(x: i64, a: i64, threads: usize) -> i64 {
    let pix = crate::pi_with_threads(x, threads);
    if a <= pix {
        pix - a + 1
    } else {
        1
    }
}

/// The partial sieve function φ(x, a).
///
/// `phi(x, 0) = max(x, 0)`; `phi(x, a) = 1` once p_a >= x. Deterministic
/// for any thread count.
pub fn phi(x: i64, a: i64, threads: usize) -> i64 {
    if x < 1 {
        return 0;
    }
    if a < 1 {
        return x;
    }
    // p_a > x / 2 >= x / p_1 already implies only 1 survives.
    if a > x / 2 {
        return 1;
    }
    if tiny::is_phi_tiny(a) {
        return tiny::phi_tiny(x, a);
    }
    if a >= pix_upper(x) {
        return 1;
    }

    let sqrtx = isqrt(x as u64) as i64;

    // Fast a > pi(sqrt(x)) check with decent accuracy; avoids building
    // the first a primes (which may be enormous) just to discover the
    // π-identity applies.
    if a > pix_upper(sqrtx) {
        return phi_pix(x, a, threads);
    }

    let pi = PiTable::new(sqrtx as u64);
    let pi_sqrtx = pi.pi(sqrtx as u64);
    // Strictly greater: a == π(√x) must stay on the recursive path, see
    // phi_pix.
    if a > pi_sqrtx {
        return phi_pix(x, a, threads);
    }

    let primes = generate_n_primes(a as usize);
    let c = tiny::get_c(sqrtx);
    let threads = crate::ideal_num_threads(threads, x, 10_000_000_000);

    let sum = tiny::phi_tiny(x, c) as i128
        + parallel_sum(
            threads,
            c,
            a - 1,
            || PhiCache::new(x as u64, a as u64, &primes, &pi),
            |cache, i| cache.phi(x / primes[(i + 1) as usize], i, -1) as i128,
        );
    sum as i64
}

/// φ(x, a) with timing printed to stderr.
pub fn phi_print(x: i64, a: i64, threads: usize) -> i64 {
    progress::header("phi(x, a)");
    let start = std::time::Instant::now();
    let sum = phi(x, a, threads);
    progress::result("phi", sum as i128, start);
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::generate_primes;

    fn phi_brute(x: i64, a: i64) -> i64 {
        let primes = generate_primes(200);
        (1..=x)
            .filter(|&n| primes[1..=(a as usize).min(primes.len() - 1)].iter().all(|&p| n % p != 0))
            .count() as i64
    }

    #[test]
    fn boundaries() {
        assert_eq!(phi(-5, 3, 1), 0);
        assert_eq!(phi(0, 0, 1), 0);
        assert_eq!(phi(1000, 0, 1), 1000);
        // a >= pi(x) leaves only the number 1.
        assert_eq!(phi(10, 10, 1), 1);
        assert_eq!(phi(100, 25, 1), 1);
    }

    #[test]
    fn matches_brute_force_small() {
        for a in 0..=20i64 {
            for &x in &[1i64, 2, 10, 100, 1000, 5000] {
                assert_eq!(phi(x, a, 1), phi_brute(x, a), "x = {x}, a = {a}");
            }
        }
    }

    #[test]
    fn recurrence_identity_through_public_api() {
        let primes = generate_primes(200);
        for a in 1..=30i64 {
            for &x in &[100i64, 12_345, 100_000] {
                let lhs = phi(x, a, 1);
                let rhs = phi(x, a - 1, 1) - phi(x / primes[a as usize], a - 1, 1);
                assert_eq!(lhs, rhs, "x = {x}, a = {a}");
            }
        }
    }

    #[test]
    fn large_a_dispatches_to_pi_identity() {
        // phi(1000, 5) through the tiny path, phi(1000, 8) through the
        // recursion, phi with a just above pi(sqrt(x)) through phi_pix.
        // All must agree with brute force.
        assert_eq!(phi(1000, 5, 1), 207);
        assert_eq!(phi(1000, 8, 1), 170);
        let x = 10_000i64;
        for a in 20..=30 {
            assert_eq!(phi(x, a, 1), phi_brute(x, a), "a = {a}");
        }
    }

    #[test]
    fn deterministic_across_thread_counts() {
        let x = 10_000_000i64;
        let a = 100i64;
        let single = phi(x, a, 1);
        let multi = phi(x, a, 8);
        assert_eq!(single, multi);
    }
}
