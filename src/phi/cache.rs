//! The recursive φ(x, a) engine with its multi-layer cache.
//!
//! φ(x, a) counts the integers ≤ x not divisible by any of the first a
//! primes, via phi(x, a) = phi(x, a-1) - phi(x / p_a, a-1). Four fast
//! paths flatten the exponential recursion:
//!
//! 1. x ≤ p_a: the count is 1 (just the number 1).
//! 2. a ≤ 7: the primorial closed form.
//! 3. x < p_{a+1}²: every survivor above the first a primes is prime, so
//!    φ(x, a) = π(x) − a + 1.
//! 4. a small and x below the cache bound: one popcount against a
//!    pre-sieved row.
//!
//! The cache is a row per level a: a bit sieve of the numbers coprime to
//! the first a primes over [0, max_x], plus cumulative counts per
//! 240-window. Rows are built lazily and in place; extending the cache to
//! a larger a never invalidates earlier rows. Each thread owns one cache,
//! which buys O(1) amortized hits without locking.

use crate::phi::tiny;
use crate::stdx::bit_sieve240::{unset_bit, unset_larger, NUMBERS_PER_WORD};
use crate::stdx::imath::isqrt;
use crate::tables::pi_table::PiTable;

/// One 240-integer window of a cache row: survivors below the window plus
/// the window's bits. Packed to 12 bytes.
#[derive(Clone, Copy)]
#[repr(C, packed(4))]
struct CacheLine {
    count: u32,
    bits: u64,
}

const _: () = assert!(std::mem::size_of::<CacheLine>() == 12);

/// Per-thread φ(x, a) evaluator. Lives for one parallel region.
pub struct PhiCache<'a> {
    primes: &'a [i64],
    pi: &'a PiTable,
    max_x: u64,
    max_x_size: usize,
    max_a_cached: i64,
    max_a: i64,
    /// rows[a] holds only numbers coprime to the first a primes;
    /// rows[a][j].count is the number of such survivors below j*240.
    rows: Vec<Vec<CacheLine>>,
}

impl<'a> PhiCache<'a> {
    /// Sizes the cache for a φ(x, a) computation.
    ///
    /// `primes` must hold at least the first a primes (1-indexed), `pi`
    /// must cover every value the π fast path will see, i.e. √x.
    pub fn new(x: u64, a: u64, primes: &'a [i64], pi: &'a PiTable) -> Self {
        let mut cache = Self {
            primes,
            pi,
            max_x: 0,
            max_x_size: 0,
            max_a_cached: 0,
            max_a: 0,
            rows: Vec::new(),
        };

        // Only levels up to 100 are worth caching, and the top ~30 levels
        // of the driver loop are too rare to pay for. Both cutoffs are
        // empirical.
        let tiny_a = tiny::max_a() as u64;
        let a = a - a.min(30);
        let max_a = a.min(100);
        if max_a <= tiny_a {
            return cache;
        }

        // Cache x up to x^(1/2.3), further capped so the rows fit the
        // per-thread budget of 16 MiB.
        let mut max_x = (x as f64).powf(1.0 / 2.3) as u64;
        let max_bytes: u64 = 16 << 20;
        let indexes = max_a - tiny_a;
        let bytes_per_index = max_bytes / indexes;
        let numbers_per_byte = NUMBERS_PER_WORD / std::mem::size_of::<CacheLine>() as u64;
        max_x = max_x.min(bytes_per_index * numbers_per_byte);

        let max_x_size = max_x.div_ceil(NUMBERS_PER_WORD);
        // For tiny computations caching is not worth it.
        if max_x_size < 8 {
            return cache;
        }

        cache.max_x_size = max_x_size as usize;
        cache.max_x = max_x_size * NUMBERS_PER_WORD - 1;
        cache.max_a = max_a as i64;
        cache.rows = vec![Vec::new(); max_a as usize + 1];
        cache
    }

    /// φ(x, a) · sign. The sign argument threads the alternating signs of
    /// the recursion through a single code path.
    pub fn phi(&mut self, x: i64, a: i64, sign: i64) -> i64 {
        debug_assert!(x >= 0 && a >= 0);
        if x <= self.primes[a as usize] {
            return sign;
        } else if tiny::is_phi_tiny(a) {
            return tiny::phi_tiny(x, a) * sign;
        } else if self.is_pix(x, a) {
            return (self.pi.pi(x as u64) - a + 1) * sign;
        } else if self.is_cached(x, a) {
            return self.phi_cache(x, a) * sign;
        }

        // Materialize the cache rows this subtree will hit.
        self.extend_cache(x as u64, a);

        let sqrtx = isqrt(x as u64) as i64;
        let mut c = tiny::get_c(sqrtx);
        let larger_c = a.min(self.max_a_cached);
        let mut sum;

        if c >= larger_c || !self.is_cached(x, larger_c) {
            sum = tiny::phi_tiny(x, c) * sign;
        } else {
            // Start the decomposition at the deepest cached row instead of
            // the tiny level; the loop below then skips i < larger_c.
            c = larger_c;
            debug_assert!(larger_c <= a);
            sum = self.phi_cache(x, c) * sign;
        }

        let mut i = c;
        while i < a {
            // If p_{i+1} > sqrt(x) there is no prime in
            // ]p_i, x / p_{i+1}], so every remaining term is 1.
            if self.primes[(i + 1) as usize] > sqrtx {
                break;
            }
            let xp = x / self.primes[(i + 1) as usize];
            if self.is_pix(xp, i) {
                break;
            }
            sum += self.phi(xp, i, -sign);
            i += 1;
        }
        while i < a {
            if self.primes[(i + 1) as usize] > sqrtx {
                break;
            }
            let xp = x / self.primes[(i + 1) as usize];
            sum += (self.pi.pi(xp as u64) - i + 1) * -sign;
            i += 1;
        }

        // phi(x / p_{i+1}, i) = 1 for every remaining i.
        sum += (a - i) * -sign;
        sum
    }

    /// If x < p_{a+1}², the survivors past the first a primes are exactly
    /// the primes in (p_a, x], so φ(x, a) = π(x) − a + 1.
    #[inline]
    fn is_pix(&self, x: i64, a: i64) -> bool {
        let p = self.primes[(a + 1) as usize];
        (x as u64) <= self.pi.limit() && (x as i128) < (p as i128) * (p as i128)
    }

    #[inline]
    fn is_cached(&self, x: i64, a: i64) -> bool {
        (x as u64) <= self.max_x && a <= self.max_a_cached
    }

    #[inline]
    fn phi_cache(&self, x: i64, a: i64) -> i64 {
        let row = &self.rows[a as usize];
        let line = row[(x / 240) as usize];
        let bits = line.bits;
        let count = line.count;
        count as i64 + (bits & unset_larger(x as u64)).count_ones() as i64
    }

    /// Extends the cache rows through `min(a, max_a)` in place.
    ///
    /// Row i is row i−1 with p_i and its odd multiples from p_i² removed,
    /// then re-counted. Rows at or below the tiny level are stepping
    /// stones and skip the count pass.
    fn extend_cache(&mut self, x: u64, a: i64) {
        let a = a.min(self.max_a);
        if x > self.max_x || a <= self.max_a_cached {
            return;
        }

        let tiny_a = tiny::max_a();
        let start = (self.max_a_cached + 1).max(3);
        self.max_a_cached = a;

        for i in start..=a {
            if i == 3 {
                // The representation already excludes multiples of 2, 3, 5.
                self.rows[3] = vec![
                    CacheLine { count: 0, bits: !0u64 };
                    self.max_x_size
                ];
                continue;
            }

            let i = i as usize;
            if (i - 1) as i64 <= tiny_a {
                self.rows[i] = std::mem::take(&mut self.rows[i - 1]);
            } else {
                self.rows[i] = self.rows[i - 1].clone();
            }

            let prime = self.primes[i] as u64;
            if prime <= self.max_x {
                let line = &mut self.rows[i][(prime / 240) as usize];
                let bits = line.bits;
                line.bits = bits & unset_bit(prime);
            }
            let mut n = prime * prime;
            while n <= self.max_x {
                let line = &mut self.rows[i][(n / 240) as usize];
                let bits = line.bits;
                line.bits = bits & unset_bit(n);
                n += prime * 2;
            }

            if i as i64 > tiny_a {
                let mut count = 0u64;
                for line in &mut self.rows[i] {
                    line.count = count as u32;
                    count += line.bits.count_ones() as u64;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::generate_n_primes;

    fn phi_brute(x: i64, a: i64, primes: &[i64]) -> i64 {
        (1..=x)
            .filter(|&n| primes[1..=a as usize].iter().all(|&p| n % p != 0))
            .count() as i64
    }

    #[test]
    fn matches_brute_force() {
        let primes = generate_n_primes(30);
        let pi = PiTable::new(10_000);
        let mut cache = PhiCache::new(100_000, 25, &primes, &pi);
        for a in 0..=25i64 {
            for &x in &[1i64, 10, 100, 500, 2000, 10_000] {
                assert_eq!(
                    cache.phi(x, a, 1),
                    phi_brute(x, a, &primes),
                    "x = {x}, a = {a}"
                );
            }
        }
    }

    #[test]
    fn sign_argument_flips_result() {
        let primes = generate_n_primes(20);
        let pi = PiTable::new(1000);
        let mut cache = PhiCache::new(10_000, 15, &primes, &pi);
        for a in 0..=15i64 {
            let plus = cache.phi(777, a, 1);
            let minus = cache.phi(777, a, -1);
            assert_eq!(plus, -minus);
        }
    }

    #[test]
    fn recurrence_identity() {
        // phi(x, a) = phi(x, a-1) - phi(x / p_a, a-1)
        let primes = generate_n_primes(30);
        let pi = PiTable::new(10_000);
        let mut cache = PhiCache::new(1 << 40, 28, &primes, &pi);
        for a in 1..=28i64 {
            for &x in &[50i64, 1234, 99_999] {
                let lhs = cache.phi(x, a, 1);
                let rhs =
                    cache.phi(x, a - 1, 1) - cache.phi(x / primes[a as usize], a - 1, 1);
                assert_eq!(lhs, rhs, "x = {x}, a = {a}");
            }
        }
    }

    #[test]
    fn cache_rows_match_direct_evaluation() {
        // Force cache materialization with a large x, then check cached
        // levels against brute force on small arguments.
        let primes = generate_n_primes(60);
        let pi = PiTable::new(100_000);
        let mut cache = PhiCache::new(1 << 50, 58, &primes, &pi);
        // Trigger row construction.
        let _ = cache.phi(1 << 40, 50, 1);
        assert!(cache.max_a_cached > tiny::max_a());
        for a in (tiny::max_a() + 1)..=cache.max_a_cached {
            for &x in &[100i64, 999, 5000] {
                assert!(cache.is_cached(x, a));
                assert_eq!(cache.phi_cache(x, a), phi_brute(x, a, &primes), "a = {a}");
            }
        }
    }
}
