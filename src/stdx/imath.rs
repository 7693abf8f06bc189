//! Integer math primitives used throughout the engine.
//!
//! All roots are exact: a floating-point seed is corrected with integer
//! comparisons, so the results are monotone and safe to use in loop bounds
//! and table sizes. Floating point is only ever a starting guess.

/// Integer square root, exact for the full `u64` domain.
///
/// `isqrt(n)` is the largest `r` with `r * r <= n`.
#[inline]
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as u64;
    // The f64 seed can be off by one in either direction near 2^52.
    while r > 0 && r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    r
}

/// Integer square root over `u128`.
///
/// The result always fits in `u64` (the engine's ceiling keeps x below
/// 2^128, so sqrt(x) < 2^64).
#[inline]
pub fn isqrt128(n: u128) -> u64 {
    if n <= u64::MAX as u128 {
        return isqrt(n as u64);
    }
    let mut r = (n as f64).sqrt() as u128;
    while r > 0 && r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    debug_assert!(r <= u64::MAX as u128);
    r as u64
}

/// Integer k-th root: the largest `r` with `r^K <= x`.
#[inline]
pub fn iroot<const K: u32>(x: u128) -> u64 {
    if x == 0 {
        return 0;
    }
    if K == 1 {
        debug_assert!(x <= u64::MAX as u128);
        return x as u64;
    }
    if K == 2 {
        return isqrt128(x);
    }
    let mut r = (x as f64).powf(1.0 / K as f64) as u128;
    while r > 0 && checked_ipow(r, K).map_or(true, |p| p > x) {
        r -= 1;
    }
    while checked_ipow(r + 1, K).map_or(false, |p| p <= x) {
        r += 1;
    }
    r as u64
}

/// `base^exp` in `u128`. Overflow is the caller's responsibility.
#[inline]
pub fn ipow(base: u128, exp: u32) -> u128 {
    let mut result: u128 = 1;
    let mut b = base;
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result *= b;
        }
        e >>= 1;
        if e > 0 {
            b = b.wrapping_mul(b);
        }
    }
    result
}

#[inline]
fn checked_ipow(base: u128, exp: u32) -> Option<u128> {
    let mut result: u128 = 1;
    for _ in 0..exp {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

/// Division with a 64-bit fast path.
///
/// The engine's preconditions guarantee the quotient fits in `i64`
/// whenever this is called; when the dividend itself fits, the division
/// runs on the 64-bit unit instead of the compiler's 128-bit helper.
#[inline]
pub fn fast_div(x: i128, d: i64) -> i64 {
    debug_assert!(x >= 0 && d > 0);
    if x <= i64::MAX as i128 {
        (x as i64) / d
    } else {
        let q = x / d as i128;
        debug_assert!(q <= i64::MAX as i128);
        q as i64
    }
}

/// Floor of the base-2 logarithm; `ilog2(0)` is defined as 0.
#[inline]
pub fn ilog2(n: u64) -> u32 {
    if n == 0 {
        0
    } else {
        63 - n.leading_zeros()
    }
}

/// Smallest power of two `>= n`.
#[inline]
pub fn next_power_of_2(n: u64) -> u64 {
    let n = n.max(1);
    if n.is_power_of_two() {
        n
    } else {
        1 << (ilog2(n) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn isqrt_small_values() {
        let expected = [0, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (n, &want) in expected.iter().enumerate() {
            assert_eq!(isqrt(n as u64), want, "isqrt({n})");
        }
    }

    #[test]
    fn isqrt_near_u64_max() {
        assert_eq!(isqrt(u64::MAX), (1u64 << 32) - 1);
        let r = 4_294_967_295u64;
        assert_eq!(isqrt(r * r), r);
        assert_eq!(isqrt(r * r - 1), r - 1);
    }

    #[test]
    fn isqrt128_crosses_u64_boundary() {
        let n = (u64::MAX as u128) + 1; // 2^64
        assert_eq!(isqrt128(n), 1u64 << 32);
        let big = 10u128.pow(24);
        let r = isqrt128(big) as u128;
        assert!(r * r <= big && (r + 1) * (r + 1) > big);
    }

    #[test]
    fn iroot_exact_powers() {
        assert_eq!(iroot::<3>(27), 3);
        assert_eq!(iroot::<3>(26), 2);
        assert_eq!(iroot::<3>(1_000_000_000_000), 10_000);
        assert_eq!(iroot::<4>(16), 2);
        assert_eq!(iroot::<4>(15), 1);
        assert_eq!(iroot::<6>(729), 3);
        assert_eq!(iroot::<6>(10u128.pow(18)), 1000);
    }

    #[test]
    fn fast_div_wide_dividend() {
        let x = 10i128.pow(24) + 7;
        assert_eq!(fast_div(x, 10i64.pow(12)), 10i64.pow(12));
        assert_eq!(fast_div(1000, 7), 142);
    }

    #[test]
    fn ilog2_values() {
        assert_eq!(ilog2(1), 0);
        assert_eq!(ilog2(2), 1);
        assert_eq!(ilog2(3), 1);
        assert_eq!(ilog2(4), 2);
        assert_eq!(ilog2(u64::MAX), 63);
    }

    #[test]
    fn next_power_of_2_values() {
        assert_eq!(next_power_of_2(0), 1);
        assert_eq!(next_power_of_2(1), 1);
        assert_eq!(next_power_of_2(3), 4);
        assert_eq!(next_power_of_2(4096), 4096);
        assert_eq!(next_power_of_2(4097), 8192);
    }

    proptest! {
        #[test]
        fn isqrt_is_exact(n in any::<u64>()) {
            let r = isqrt(n);
            prop_assert!((r as u128) * (r as u128) <= n as u128);
            prop_assert!(((r + 1) as u128) * ((r + 1) as u128) > n as u128);
        }

        #[test]
        fn isqrt_is_monotone(n in 0u64..u64::MAX) {
            prop_assert!(isqrt(n) <= isqrt(n + 1));
        }

        #[test]
        fn iroot3_is_exact(x in any::<u64>()) {
            let r = iroot::<3>(x as u128) as u128;
            prop_assert!(r * r * r <= x as u128);
            prop_assert!((r + 1) * (r + 1) * (r + 1) > x as u128);
        }

        #[test]
        fn fast_div_matches_wide_division(x in 0i128..=i64::MAX as i128, d in 1i64..=i64::MAX) {
            prop_assert_eq!(fast_div(x, d) as i128, x / d as i128);
        }
    }
}
