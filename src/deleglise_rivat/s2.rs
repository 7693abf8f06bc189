//! The special-leaves sum S2 for 64-bit x.
//!
//! S2 = Σ −μ(m)·φ(x/(p_b·m), b−1) over the special leaves p_b·m with
//! y/p_b < m ≤ y and lpf(m) > p_b. The sum splits by how cheaply φ can be
//! answered:
//!
//! - **trivial** leaves: φ = 1, counted in O(1) per prime;
//! - **clustered easy** leaves: φ = π(x/n) − b + 2 and consecutive
//!   second factors yield identical π values, so whole runs are added at
//!   once via a binary jump through the primes table;
//! - **sparse easy** leaves: same φ identity, runs of length 1;
//! - **hard** leaves: φ must be counted by the segmented sieve with the
//!   Fenwick tree answering "survivors ≤ x/n" per segment.
//!
//! The easy leaves are independent per prime index b and go through the
//! dynamic scheduler; the hard-leaf walk carries per-prime state across
//! segments and stays sequential.

use crate::progress::Progress;
use crate::sieve::{cross_off, cross_off_uncounted, BitSegment};
use crate::stdx::counters::Counters;
use crate::stdx::dynamic_schedule::parallel_sum;
use crate::stdx::imath::{iroot, isqrt, next_power_of_2};
use crate::tables::pi_table::PiTable;

/// Shared read-only inputs of one S2 computation.
pub(crate) struct S2Input<'a> {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub c: i64,
    pub primes: &'a [i64],
    pub lpf: &'a [i64],
    pub mu: &'a [i32],
    /// π oracle over [0, y].
    pub pi: &'a PiTable,
}

/// S2 = trivial + easy + hard special leaves.
pub(crate) fn s2(s: &S2Input<'_>, threads: usize, progress: &Progress) -> i64 {
    let mut total = s2_trivial(s) as i128;
    total += s2_easy(s, threads, progress);
    total += s2_sieve(s, progress) as i128;
    total as i64
}

/// Trivial leaves: for p_b² > x/y every leaf of b has φ(x/n, b−1) = 1,
/// so the contribution is just the count of valid second primes.
pub(crate) fn s2_trivial(s: &S2Input<'_>) -> i64 {
    let pi_y = s.pi.pi(s.y as u64);
    let pi_sqrtz = s.pi.pi(isqrt(s.z as u64).min(s.y as u64));
    let mut result = 0i64;

    for b in s.c.max(pi_sqrtz + 1)..pi_y {
        let prime = s.primes[b as usize];
        let pp = prime as i128 * prime as i128;
        let xpp = if pp > s.x as i128 {
            0
        } else {
            (s.x as i128 / pp) as i64
        };
        result += pi_y - s.pi.pi(xpp.max(prime) as u64);
    }
    result
}

/// Clustered and sparse easy leaves, distributed over b.
pub(crate) fn s2_easy(s: &S2Input<'_>, threads: usize, progress: &Progress) -> i128 {
    let pi_sqrty = s.pi.pi(isqrt(s.y as u64));
    let pi_x13 = s.pi.pi(iroot::<3>(s.x as u128).min(s.y as u64));
    let start_b = s.c.max(pi_sqrty) + 1;

    parallel_sum(threads, start_b, pi_x13, || (), |_, b| {
        progress.report(b - start_b, pi_x13 + 1 - start_b);
        easy_leaves_for(s, b)
    })
}

fn easy_leaves_for(s: &S2Input<'_>, b: i64) -> i128 {
    let x = s.x;
    let prime = s.primes[b as usize];
    let min_trivial = x / (prime * prime);
    let min_hard = (s.y / prime).max(prime);
    let min_clustered = (isqrt((x / prime) as u64) as i64).max(min_hard);
    let min_sparse = (s.z / prime).max(min_hard);

    let mut l = s.pi.pi(min_trivial.min(s.y) as u64);
    let mut result = 0i128;

    // Runs of identical phi values: phi(x/n, b-1) = pi(x/n) - b + 2, and
    // the smallest second prime with the same value is found by indexing
    // the primes table at b + phi - 1.
    while s.primes[l as usize] > min_clustered {
        let n = prime as i128 * s.primes[l as usize] as i128;
        let xn = (x as i128 / n) as i64;
        debug_assert!((xn as i128) < prime as i128 * prime as i128);
        let phi_xn = s.pi.pi(xn as u64) - b + 2;
        let m = prime as i128 * s.primes[(b + phi_xn - 1) as usize] as i128;
        let xm = ((x as i128 / m) as i64).max(min_clustered);
        let l2 = s.pi.pi(xm as u64);
        result += phi_xn as i128 * (l - l2) as i128;
        l = l2;
    }

    while s.primes[l as usize] > min_sparse {
        let n = prime as i128 * s.primes[l as usize] as i128;
        let xn = (x as i128 / n) as i64;
        result += (s.pi.pi(xn as u64) - b + 2) as i128;
        l -= 1;
    }

    result
}

/// Hard leaves: segmented sieve over [1, z] with the counter tree
/// answering φ(x/n, b−1) = phi[b] + survivors ≤ x/n − low.
pub(crate) fn s2_sieve(s: &S2Input<'_>, progress: &Progress) -> i64 {
    let (x, y, z, c) = (s.x, s.y, s.z, s.c);
    let limit = z + 1;
    let segment_size = next_power_of_2(isqrt(limit as u64)) as i64;
    let pi_sqrty = s.pi.pi(isqrt(y as u64));
    let pi_sqrtz = s.pi.pi(isqrt(z as u64).min(y as u64));
    if c >= pi_sqrtz {
        // No prime range left that needs the sieve.
        return 0;
    }

    let mut result = 0i128;
    let mut sieve = BitSegment::new(segment_size as usize);
    let mut counters = Counters::new(segment_size as usize);
    // Per-prime crossing position and φ contribution, carried across
    // segments.
    let mut next: Vec<i64> = s.primes[..=pi_sqrtz as usize].to_vec();
    let mut phi: Vec<i64> = vec![0; pi_sqrtz as usize + 1];

    let mut low = 1i64;
    while low < limit {
        let high = (low + segment_size).min(limit);
        sieve.fill(low as u64, high as u64);
        let mut b = 2i64;

        'segment: {
            // Leaves with b <= c contribute nothing; just keep their
            // multiples out of the sieve.
            while b <= c {
                cross_off_uncounted(s.primes[b as usize], low, high, &mut next[b as usize], &mut sieve);
                b += 1;
            }
            counters.init(sieve.words());

            // Leaves n = p_b * m with mu[m] != 0, lpf[m] > p_b and
            // low <= x/n < high.
            while b <= pi_sqrty {
                let prime = s.primes[b as usize];
                let min_m = ((x as i128 / (prime as i128 * high as i128)) as i64).max(y / prime);
                let max_m = ((x as i128 / (prime as i128 * low as i128)) as i64).min(y);

                if prime >= max_m {
                    break 'segment;
                }

                for m in ((min_m + 1)..=max_m).rev() {
                    if s.mu[m as usize] != 0 && prime < s.lpf[m as usize] {
                        let n = prime as i128 * m as i128;
                        let xn = (x as i128 / n) as i64;
                        let count = counters.query((xn - low) as usize);
                        let phi_xn = phi[b as usize] + count;
                        result -= s.mu[m as usize] as i128 * phi_xn as i128;
                    }
                }

                phi[b as usize] += counters.query((high - 1 - low) as usize);
                cross_off(prime, low, high, &mut next[b as usize], &mut sieve, &mut counters);
                b += 1;
            }

            // Hard leaves n = p_b * p_l with low <= x/n < high.
            while b <= pi_sqrtz {
                let prime = s.primes[b as usize];
                let l_start = ((x as i128 / (prime as i128 * low as i128)) as i64)
                    .min(z / prime)
                    .min(y);
                let mut l = s.pi.pi(l_start as u64);
                let min_hard = ((x as i128 / (prime as i128 * high as i128)) as i64)
                    .max(y / prime)
                    .max(prime);

                if prime >= s.primes[l as usize] {
                    break 'segment;
                }

                while s.primes[l as usize] > min_hard {
                    let n = prime as i128 * s.primes[l as usize] as i128;
                    let xn = (x as i128 / n) as i64;
                    let count = counters.query((xn - low) as usize);
                    result += (phi[b as usize] + count) as i128;
                    l -= 1;
                }

                phi[b as usize] += counters.query((high - 1 - low) as usize);
                cross_off(prime, low, high, &mut next[b as usize], &mut sieve, &mut counters);
                b += 1;
            }
        }

        progress.report(low, limit);
        low += segment_size;
    }

    result as i64
}
