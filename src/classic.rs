//! The classical prime-counting algorithms.
//!
//! Legendre, Meissel, Lehmer and Lagarias–Miller–Odlyzko, in increasing
//! order of sophistication. All delegate the heavy lifting to φ and P2;
//! they exist as independently correct references for the fast engines,
//! and Meissel doubles as the π service behind the φ escape hatch for
//! mid-sized arguments.
//!
//! None of these are the fast path: the Deléglise–Rivat engine is. They
//! are kept simple and obviously faithful to their formulas instead.

use crate::p2::p2;
use crate::phi::{cache::PhiCache, phi, tiny};
use crate::stdx::imath::{iroot, isqrt};
use crate::tables::{
    count_primes, generate_lpf, generate_moebius, generate_primes, pi_bsearch,
    pi_table::PiTable,
};

use crate::SIEVE_FLOOR;

/// π of a small-to-medium bound: direct sieve when cheap, Meissel above.
pub(crate) fn pi_small(x: i64, threads: usize) -> i64 {
    if x < 100_000_000 {
        count_primes(x)
    } else {
        pi_meissel(x, threads)
    }
}

/// Legendre's formula: π(x) = φ(x, a) + a − 1 with a = π(√x).
pub fn pi_legendre(x: i64, threads: usize) -> i64 {
    if x < SIEVE_FLOOR {
        return count_primes(x);
    }
    let a = pi_small(isqrt(x as u64) as i64, threads);
    phi(x, a, threads) + a - 1
}

/// Meissel's formula: π(x) = φ(x, a) + a − 1 − P2(x, p_a) with
/// a = π(x^{1/3}).
pub fn pi_meissel(x: i64, threads: usize) -> i64 {
    if x < SIEVE_FLOOR {
        return count_primes(x);
    }
    let x13 = iroot::<3>(x as u128) as i64;
    let primes = generate_primes(x13);
    let a = primes.len() as i64 - 1;
    phi(x, a, threads) + a - 1 - p2(x, primes[a as usize])
}

/// Lehmer's formula with the P3 correction term.
///
/// a = π(x^{1/4}), b = π(√x), c = π(x^{1/3}):
///
/// ```text
/// π(x) = φ(x, a) + (b + a − 2)(b − a + 1)/2
///        − Σ_{a < i ≤ b} π(x/p_i)
///        − Σ_{a < i ≤ c} Σ_{i ≤ j ≤ π(√(x/p_i))} ( π(x/(p_i p_j)) − (j − 1) )
/// ```
///
/// The π(x/p_i) values reach x^{3/4}; they come from one dense table when
/// that fits, else from recursive Meissel.
pub fn pi_lehmer(x: i64, threads: usize) -> i64 {
    if x < SIEVE_FLOOR {
        return count_primes(x);
    }
    let sqrtx = isqrt(x as u64) as i64;
    let a = pi_small(iroot::<4>(x as u128) as i64, threads);
    let b = pi_small(sqrtx, threads);
    let c = pi_small(iroot::<3>(x as u128) as i64, threads);

    let primes = generate_primes(sqrtx);
    let x34 = x / primes[(a + 1) as usize].max(1);
    let big_pi = if x34 <= 100_000_000 {
        Some(PiTable::new(x34 as u64))
    } else {
        None
    };
    let pi_big = |w: i64| -> i64 {
        match &big_pi {
            Some(table) => table.pi(w as u64),
            None => pi_meissel(w, threads),
        }
    };

    let mut sum = phi(x, a, threads) + (b + a - 2) * (b - a + 1) / 2;
    for i in (a + 1)..=b {
        let w = x / primes[i as usize];
        sum -= pi_big(w);
        if i <= c {
            let bi = pi_bsearch(&primes, isqrt(w as u64) as i64);
            for j in i..=bi {
                sum -= pi_bsearch(&primes, w / primes[j as usize]) - (j - 1);
            }
        }
    }
    sum
}

/// Lagarias–Miller–Odlyzko: π(x) = S1 + S2 + π(y) − 1 − P2(x, y) with
/// y = x^{1/3}.
///
/// The special-leaves sum iterates every leaf n = p_{b+1}·m directly and
/// evaluates φ through a cache; the segmented engines exist because this
/// does not scale, but for moderate x it is a clean oracle.
pub fn pi_lmo(x: i64, threads: usize) -> i64 {
    if x < SIEVE_FLOOR {
        return count_primes(x);
    }
    let y = iroot::<3>(x as u128) as i64;
    let mu = generate_moebius(y);
    let lpf = generate_lpf(y);
    let primes = generate_primes(y);
    let pi_y = primes.len() as i64 - 1;
    let c = pi_y.min(tiny::max_a());

    let s1 = crate::s1::s1(x, y, c, primes[c as usize], &lpf, &mu);
    let p2_term = p2(x, y);

    // One special leaf per (p_{b+1}, m); the b iterations are independent,
    // so they go through the dynamic scheduler with one φ cache per thread.
    let pi_table = PiTable::new(isqrt(x as u64));
    let threads = crate::ideal_num_threads(threads, x, 1_000_000);
    let s2 = crate::stdx::dynamic_schedule::parallel_sum(
        threads,
        c,
        pi_y - 1,
        || PhiCache::new(x as u64, pi_y as u64, &primes, &pi_table),
        |cache, b| {
            let pb1 = primes[(b + 1) as usize];
            let mut local = 0i128;
            for m in (y / pb1 + 1)..=y {
                if mu[m as usize] != 0 && lpf[m as usize] > pb1 {
                    local -= mu[m as usize] as i128 * cache.phi(x / (pb1 * m), b, 1) as i128;
                }
            }
            local
        },
    ) as i64;

    s1 + s2 + pi_y - 1 - p2_term
}
