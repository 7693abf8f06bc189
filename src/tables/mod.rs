//! One-shot table generators: primes, least prime factors, the Möbius
//! function, and prime counts for small bounds.
//!
//! All tables are built once at the start of a π(x) computation and are
//! read-only afterwards. Primes tables are 1-indexed with a zero sentinel
//! at index 0, so `primes[i]` is the i-th prime.

use crate::stdx::imath::isqrt;

pub mod pi_table;
pub mod segmented_pi;

/// π(k) for k in 0..=6, the values below the first representable residue.
pub(crate) const PI_TINY: [i64; 7] = [0, 0, 1, 2, 2, 3, 3];

/// Bitmap over odd numbers: bit `i` set means `2i + 1` is prime.
///
/// Index 0 (the number 1) is cleared. The caller owns interpreting `2`.
pub(crate) fn odd_prime_bitmap(limit: u64) -> Vec<u64> {
    // Highest index of an odd number <= limit.
    let h = limit.saturating_sub(1) / 2;
    let words = (h / 64 + 1) as usize;
    let mut bits = vec![!0u64; words];
    bits[0] &= !1; // 1 is not prime
    let sqrt = isqrt(limit);
    for i in 1..=(sqrt / 2) {
        if (bits[(i / 64) as usize] >> (i % 64)) & 1 == 1 {
            let prime = 2 * i + 1;
            let mut j = 2 * i * (i + 1); // index of prime^2
            while j <= h {
                bits[(j / 64) as usize] &= !(1u64 << (j % 64));
                j += prime;
            }
        }
    }
    // Clear padding bits beyond the limit.
    for i in (h + 1)..(words as u64 * 64) {
        bits[(i / 64) as usize] &= !(1u64 << (i % 64));
    }
    bits
}

/// Iterates the odd primes of a bitmap in ascending order.
pub(crate) fn for_each_odd_prime(bits: &[u64], limit: u64, mut f: impl FnMut(u64)) {
    for (w, &word) in bits.iter().enumerate() {
        let mut word = word;
        while word != 0 {
            let bit = word.trailing_zeros() as u64;
            word &= word - 1;
            let p = (w as u64 * 64 + bit) * 2 + 1;
            if p > limit {
                return;
            }
            f(p);
        }
    }
}

/// Upper bound on π(n) for pre-allocation; overestimates by a few percent.
fn prime_count_upper(n: u64) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (nf / nf.ln() * 1.15) as usize + 8
}

/// Generates the primes `<= limit`, 1-indexed with `primes[0] == 0`.
pub fn generate_primes(limit: i64) -> Vec<i64> {
    let mut primes = Vec::with_capacity(prime_count_upper(limit.max(0) as u64) + 1);
    primes.push(0);
    if limit < 2 {
        return primes;
    }
    primes.push(2);
    let limit = limit as u64;
    let bits = odd_prime_bitmap(limit);
    for_each_odd_prime(&bits, limit, |p| primes.push(p as i64));
    primes
}

/// Generates the first `n` primes, 1-indexed with `primes[0] == 0`.
pub fn generate_n_primes(n: usize) -> Vec<i64> {
    if n == 0 {
        return vec![0];
    }
    // p_n < n (ln n + ln ln n) for n >= 6; widen a little and retry on the
    // (never observed) shortfall.
    let mut bound = if n < 6 {
        16
    } else {
        let nf = n as f64;
        (nf * (nf.ln() + nf.ln().ln()) * 1.1) as i64 + 16
    };
    loop {
        let primes = generate_primes(bound);
        if primes.len() > n {
            let mut primes = primes;
            primes.truncate(n + 1);
            return primes;
        }
        bound *= 2;
    }
}

/// Generates the least-prime-factor table: `lpf[m]` for `2 <= m <= limit`.
///
/// `lpf[1]` is `i64::MAX` (the +infinity convention), so "lpf(n) > p"
/// holds for n = 1 without a special case. `lpf[0]` is 0 and unused.
pub fn generate_lpf(limit: i64) -> Vec<i64> {
    let n = limit.max(0) as usize;
    let mut lpf = vec![0i64; n + 1];
    if n >= 1 {
        lpf[1] = i64::MAX;
    }
    for i in 2..=n {
        if lpf[i] == 0 {
            for j in (i..=n).step_by(i) {
                if lpf[j] == 0 {
                    lpf[j] = i as i64;
                }
            }
        }
    }
    lpf
}

/// Generates the Möbius function table: `mu[m]` in {-1, 0, 1} for
/// `1 <= m <= limit`. `mu[0]` is 0 and unused.
pub fn generate_moebius(limit: i64) -> Vec<i32> {
    let n = limit.max(0) as usize;
    let lpf = generate_lpf(limit);
    let mut mu = vec![0i32; n + 1];
    if n >= 1 {
        mu[1] = 1;
    }
    for m in 2..=n {
        let p = lpf[m] as usize;
        let rest = m / p;
        mu[m] = if rest % p == 0 { 0 } else { -mu[rest] };
    }
    mu
}

/// Counts the primes `<= limit` by direct sieve. Intended for small
/// bounds (dispatch floors, π of roots); the combinatorial algorithms
/// take over beyond that.
pub fn count_primes(limit: i64) -> i64 {
    if limit < 2 {
        return 0;
    }
    let limit = limit as u64;
    let bits = odd_prime_bitmap(limit);
    1 + bits.iter().map(|w| w.count_ones() as i64).sum::<i64>()
}

/// Number of primes in `primes[1..]` that are `<= value`, by binary search.
pub fn pi_bsearch(primes: &[i64], value: i64) -> i64 {
    debug_assert!(primes[0] == 0);
    primes[1..].partition_point(|&p| p <= value) as i64
}
