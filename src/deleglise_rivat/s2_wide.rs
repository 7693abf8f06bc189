//! The special-leaves sum S2 for 128-bit x.
//!
//! Same decomposition as the 64-bit engine, but arranged as one merged
//! per-b loop inside the segment walk: trivial, clustered, sparse and
//! hard leaves of a prime index are peeled off in order, each phase
//! bounded below by the next. Quotients are clamped to y inside i128
//! before narrowing, since x/(p·low) no longer fits in 64 bits.

use crate::progress::Progress;
use crate::sieve::{cross_off, cross_off_uncounted, BitSegment};
use crate::stdx::counters::Counters;
use crate::stdx::imath::{isqrt, isqrt128, next_power_of_2};
use crate::tables::pi_table::PiTable;

pub(crate) struct S2WideInput<'a> {
    pub x: i128,
    pub y: i64,
    pub z: i64,
    pub c: i64,
    pub primes: &'a [i64],
    pub lpf: &'a [i64],
    pub mu: &'a [i32],
    pub pi: &'a PiTable,
}

/// min(x / d, cap) evaluated in i128, narrowed afterwards.
#[inline]
fn div_min(x: i128, d: i128, cap: i64) -> i64 {
    let q = x / d;
    if q > cap as i128 {
        cap
    } else {
        q as i64
    }
}

pub(crate) fn s2_wide(s: &S2WideInput<'_>, progress: &Progress) -> i128 {
    let (x, y, z, c) = (s.x, s.y, s.z, s.c);
    let pi_y = s.pi.pi(y as u64);
    let pi_sqrty = s.pi.pi(isqrt(y as u64));
    let pi_sqrtz = s.pi.pi(isqrt(z as u64).min(y as u64));
    let limit = z + 1;
    let segment_size = next_power_of_2(isqrt(limit as u64)) as i64;

    let mut result = 0i128;
    let mut sieve = BitSegment::new(segment_size as usize);
    let mut counters = Counters::new(segment_size as usize);
    let mut next: Vec<i64> = s.primes[..=pi_sqrtz as usize].to_vec();
    let mut phi: Vec<i64> = vec![0; pi_sqrtz as usize + 1];

    let mut low = 1i64;
    while low < limit {
        let high = (low + segment_size).min(limit);
        let mut b = c + 1;

        'segment: {
            if c < pi_sqrtz {
                sieve.fill(low as u64, high as u64);
                for i in 2..=c {
                    cross_off_uncounted(
                        s.primes[i as usize],
                        low,
                        high,
                        &mut next[i as usize],
                        &mut sieve,
                    );
                }
                counters.init(sieve.words());
            }

            // Leaves n = p_b * m with mu[m] != 0 and p_b < lpf[m].
            while b <= pi_sqrty {
                let prime = s.primes[b as usize];
                let min_m =
                    div_min(x, prime as i128 * high as i128, y).max(y / prime);
                let max_m = div_min(x, prime as i128 * low as i128, y);

                if prime >= max_m {
                    break 'segment;
                }

                for m in ((min_m + 1)..=max_m).rev() {
                    if s.mu[m as usize] != 0 && prime < s.lpf[m as usize] {
                        let n = prime as i128 * m as i128;
                        let xn = (x / n) as i64;
                        let count = counters.query((xn - low) as usize);
                        let phi_xn = phi[b as usize] + count;
                        result -= s.mu[m as usize] as i128 * phi_xn as i128;
                    }
                }

                phi[b as usize] += counters.query((high - 1 - low) as usize);
                cross_off(prime, low, high, &mut next[b as usize], &mut sieve, &mut counters);
                b += 1;
            }

            // Leaves n = p_b * p_l, all four kinds peeled in order.
            while b < pi_y {
                let prime = s.primes[b as usize];
                let mut l = s.pi.pi(div_min(x, prime as i128 * low as i128, y) as u64);

                if prime >= s.primes[l as usize] {
                    break 'segment;
                }

                let min_hard = div_min(x, prime as i128 * high as i128, y)
                    .max(y / prime)
                    .max(prime);
                let min_trivial = div_min(x, prime as i128 * prime as i128, y).max(min_hard);
                let min_clustered =
                    (isqrt128((x / prime as i128) as u128) as i64).min(y).max(min_hard);
                let min_sparse = (z / prime).min(y).max(min_hard);

                // phi(x / n, b - 1) = 1.
                if s.primes[l as usize] > min_trivial {
                    let l_min = s.pi.pi(min_trivial as u64);
                    result += (l - l_min) as i128;
                    l = l_min;
                }

                // Runs of identical pi(x / n) - b + 2 values.
                while s.primes[l as usize] > min_clustered {
                    let n = prime as i128 * s.primes[l as usize] as i128;
                    let xn = (x / n) as i64;
                    let phi_xn = s.pi.pi(xn as u64) - b + 2;
                    let m = prime as i128 * s.primes[(b + phi_xn - 1) as usize] as i128;
                    let xm = ((x / m) as i64).max(min_clustered);
                    let l2 = s.pi.pi(xm as u64);
                    result += phi_xn as i128 * (l - l2) as i128;
                    l = l2;
                }

                // Runs of length 1.
                while s.primes[l as usize] > min_sparse {
                    let n = prime as i128 * s.primes[l as usize] as i128;
                    let xn = (x / n) as i64;
                    result += (s.pi.pi(xn as u64) - b + 2) as i128;
                    l -= 1;
                }

                if b <= pi_sqrtz {
                    while s.primes[l as usize] > min_hard {
                        let n = prime as i128 * s.primes[l as usize] as i128;
                        let xn = (x / n) as i64;
                        let count = counters.query((xn - low) as usize);
                        result += (phi[b as usize] + count) as i128;
                        l -= 1;
                    }

                    phi[b as usize] += counters.query((high - 1 - low) as usize);
                    cross_off(prime, low, high, &mut next[b as usize], &mut sieve, &mut counters);
                }
                b += 1;
            }
        }

        progress.report(low, limit);
        low += segment_size;
    }

    result
}
