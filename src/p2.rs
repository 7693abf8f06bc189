//! The two-prime term.
//!
//! P2(x, y) counts the integers ≤ x with exactly two prime factors, both
//! greater than y:
//!
//! ```text
//! P2(x, y) = Σ_{y < p ≤ √x} ( π(x/p) − π(p) + 1 )
//! ```
//!
//! The π(p) part comes straight from a π table over [0, √x]. The π(x/p)
//! values lie in (√x, x/y]; enumerating p in descending order makes the
//! quotients ascending, so one segmented sieve walk over (√x, x/y]
//! resolves them all with a monotone scan per segment.

use crate::sieve::BitSegment;
use crate::stdx::imath::{fast_div, isqrt128};
use crate::tables::{generate_primes, pi_table::PiTable};

/// P2(x, y) for 64-bit x.
pub fn p2(x: i64, y: i64) -> i64 {
    p2_128(x as i128, y) as i64
}

/// P2(x, y) for 128-bit x.
pub fn p2_128(x: i128, y: i64) -> i128 {
    if x < 4 {
        return 0;
    }
    let sqrtx = isqrt128(x as u128) as i64;
    if y >= sqrtx {
        return 0;
    }

    let primes = generate_primes(sqrtx);
    let pi = PiTable::new(sqrtx as u64);
    let start = pi.pi(y.max(0) as u64);
    let end = pi.pi(sqrtx as u64);
    if start >= end {
        return 0;
    }

    let mut sum: i128 = 0;
    for i in (start + 1)..=end {
        sum += (1 - i) as i128;
    }

    // Quotients x / p_i in ascending order (p descending).
    let quots: Vec<i64> = ((start + 1)..=end)
        .rev()
        .map(|i| fast_div(x, primes[i as usize]))
        .collect();
    let mut qi = 0;

    // Quotients that the dense table already covers.
    while qi < quots.len() && quots[qi] <= sqrtx {
        sum += pi.pi(quots[qi] as u64) as i128;
        qi += 1;
    }
    if qi == quots.len() {
        return sum;
    }

    // Segmented walk over (sqrtx, max quotient].
    let max_q = *quots.last().unwrap();
    let segment_size = 1usize << 20;
    let mut sieve = BitSegment::new(segment_size);
    let mut pc = end; // π(low - 1) as the walk advances
    let mut low = sqrtx + 1;
    if low % 2 == 0 {
        // Even numbers here are composite; starting one later loses nothing.
        low += 1;
    }

    while low <= max_q {
        // Quotients on a skipped even boundary: even numbers > 2 are not
        // prime, so π there is the carried prefix count.
        while qi < quots.len() && quots[qi] < low {
            sum += pc as i128;
            qi += 1;
        }
        let high = (low + segment_size as i64).min(max_q + 1);
        sieve.fill(low as u64, high as u64);
        for &p in &primes[2..] {
            if p * p >= high {
                break;
            }
            let mut n = (((low + p - 1) / p) * p).max(p * p);
            if n % 2 == 0 {
                n += p;
            }
            while n < high {
                sieve.unset((n - low) as usize);
                n += 2 * p;
            }
        }

        // Monotone prefix scan: quotients are ascending, so full words are
        // consumed once and only the current word is re-masked.
        let words = sieve.words();
        let mut full_words = 0usize;
        let mut counted = 0i64;
        while qi < quots.len() && quots[qi] < high {
            let offset = (quots[qi] - low) as usize;
            let w = offset / 64;
            while full_words < w {
                counted += words[full_words].count_ones() as i64;
                full_words += 1;
            }
            let mask = if offset % 64 == 63 {
                !0u64
            } else {
                (1u64 << (offset % 64 + 1)) - 1
            };
            let partial = (words[w] & mask).count_ones() as i64;
            sum += (pc + counted + partial) as i128;
            qi += 1;
        }

        pc += words.iter().map(|w| w.count_ones() as i64).sum::<i64>();
        low = high;
        if low % 2 == 0 {
            low += 1;
        }
    }
    // A trailing quotient on a skipped even boundary.
    while qi < quots.len() {
        sum += pc as i128;
        qi += 1;
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::generate_primes;

    /// Counts p*q <= x with y < p <= q directly.
    fn p2_brute(x: i64, y: i64) -> i64 {
        let primes = generate_primes(x / 2);
        let ps: Vec<i64> = primes[1..].iter().copied().filter(|&p| p > y).collect();
        let mut count = 0i64;
        for (i, &p) in ps.iter().enumerate() {
            if p * p > x {
                break;
            }
            for &q in &ps[i..] {
                if p * q > x {
                    break;
                }
                count += 1;
            }
        }
        count
    }

    #[test]
    fn matches_brute_force() {
        for &(x, y) in &[
            (100i64, 3i64),
            (1000, 7),
            (1000, 3),
            (10_000, 13),
            (50_000, 23),
            (100_000, 41),
        ] {
            assert_eq!(p2(x, y), p2_brute(x, y), "x = {x}, y = {y}");
        }
    }

    #[test]
    fn empty_ranges() {
        assert_eq!(p2(3, 1), 0);
        assert_eq!(p2(100, 10), 0); // no prime in (10, 10]
        assert_eq!(p2(100, 97), 0);
    }

    #[test]
    fn wide_matches_narrow() {
        assert_eq!(p2_128(100_000, 41), p2(100_000, 41) as i128);
    }
}
