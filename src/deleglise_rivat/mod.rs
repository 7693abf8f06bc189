//! Deléglise–Rivat prime counting.
//!
//! π(x) = S1 + S2 + π(y) − 1 − P2(x, y) with y = α·x^{1/3}, z = x/y and
//! c = min(π(y), 7). S1 is the ordinary-leaves sum, S2 the special-leaves
//! engine in [`s2`], P2 the two-prime term. Runs in
//! O(x^{2/3} / (log x)²) operations and O(x^{1/3} · (log x)³) space.
//!
//! Three variants: sequential, parallel, and the 128-bit arrangement with
//! its merged per-b leaf loop and the α divisor retuned for the wider
//! integer path.

pub(crate) mod s2;
mod s2_wide;

use crate::progress::Progress;
use crate::stdx::imath::iroot;
use crate::tables::{count_primes, generate_lpf, generate_moebius, generate_primes};
use crate::tables::pi_table::PiTable;
use crate::{Error, MAX_PI_X};

/// α ≈ (log x)³ / divisor, clamped to [1, x^{1/6}].
pub(crate) fn compute_alpha(x: f64, divisor: f64) -> f64 {
    let ln = x.ln();
    let alpha = ln * ln * ln / divisor;
    alpha.clamp(1.0, x.powf(1.0 / 6.0))
}

/// Sequential Deléglise–Rivat.
pub fn pi_deleglise_rivat1(x: i64) -> i64 {
    pi_dr64(x, 1, &Progress::off())
}

/// Parallel Deléglise–Rivat: easy leaves and the φ-style reductions are
/// distributed by the dynamic scheduler; determinism is independent of
/// the thread count.
pub fn pi_deleglise_rivat2(x: i64, threads: usize) -> i64 {
    pi_dr64(x, threads, &Progress::off())
}

pub(crate) fn pi_dr64(x: i64, threads: usize, progress: &Progress) -> i64 {
    if x < crate::SIEVE_FLOOR {
        return count_primes(x);
    }

    let alpha = compute_alpha(x as f64, 1500.0);
    let y = (alpha * iroot::<3>(x as u128) as f64) as i64;
    let z = x / y;

    let p2 = crate::p2::p2(x, y);
    let mu = generate_moebius(y);
    let lpf = generate_lpf(y);
    let primes = generate_primes(y);
    let pi = PiTable::new(y as u64);

    let pi_y = primes.len() as i64 - 1;
    let c = pi_y.min(crate::phi::tiny::max_a());
    let s1 = crate::s1::s1(x, y, c, primes[c as usize], &lpf, &mu);
    let s2 = s2::s2(
        &s2::S2Input { x, y, z, c, primes: &primes, lpf: &lpf, mu: &mu, pi: &pi },
        threads,
        progress,
    );

    s1 + s2 + pi_y - 1 - p2
}

/// 128-bit Deléglise–Rivat, for x beyond the 64-bit engines.
///
/// Sequential, like the original 128-bit arrangement: the merged leaf
/// loop carries per-prime φ state across segments. Rejects x above
/// [`MAX_PI_X`].
pub fn pi_deleglise_rivat3(x: i128) -> Result<i128, Error> {
    if x > MAX_PI_X {
        return Err(Error::InputTooLarge { x, limit: MAX_PI_X });
    }
    if x < crate::SIEVE_FLOOR as i128 {
        return Ok(count_primes(x as i64) as i128);
    }

    // The empirical optimum for the wider integer path sits lower.
    let alpha = compute_alpha(x as f64, 1000.0);
    let y = (alpha * iroot::<3>(x as u128) as f64) as i64;
    let z = (x / y as i128) as i64;

    let p2 = crate::p2::p2_128(x, y);
    let mu = generate_moebius(y);
    let lpf = generate_lpf(y);
    let primes = generate_primes(y);
    let pi = PiTable::new(y as u64);

    let pi_y = primes.len() as i64 - 1;
    let c = pi_y.min(crate::phi::tiny::max_a());
    let s1 = crate::s1::s1_128(x, y, c, primes[c as usize], &lpf, &mu);
    let s2 = s2_wide::s2_wide(
        &s2_wide::S2WideInput { x, y, z, c, primes: &primes, lpf: &lpf, mu: &mu, pi: &pi },
        &Progress::off(),
    );

    Ok(s1 + s2 + pi_y as i128 - 1 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::count_primes;

    #[test]
    fn matches_sieve_counts() {
        for &x in &[
            0i64, 1, 2, 99, 100, 101, 1000, 10_000, 65_536, 100_000, 999_999, 1_000_000,
        ] {
            let expected = count_primes(x);
            assert_eq!(pi_deleglise_rivat1(x), expected, "x = {x}");
        }
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        for &x in &[123_456i64, 1_000_000, 5_000_000] {
            assert_eq!(pi_deleglise_rivat1(x), pi_deleglise_rivat2(x, 8), "x = {x}");
        }
    }

    #[test]
    fn wide_variant_agrees() {
        for &x in &[100i64, 10_000, 1_000_000, 12_345_678] {
            assert_eq!(
                pi_deleglise_rivat3(x as i128).unwrap(),
                pi_deleglise_rivat1(x) as i128,
                "x = {x}"
            );
        }
    }

    #[test]
    fn rejects_beyond_ceiling() {
        assert!(matches!(
            pi_deleglise_rivat3(MAX_PI_X + 1),
            Err(Error::InputTooLarge { .. })
        ));
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(compute_alpha(100.0, 1500.0), 1.0);
        let a = compute_alpha(1e12, 1500.0);
        assert!(a > 1.0 && a < 1e2);
    }
}
