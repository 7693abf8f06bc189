//! Random-access π(k) oracle.
//!
//! One `(count, bits)` pair covers 240 integers: `count` is the number of
//! primes below the window and `bits` marks the primes among the residues
//! coprime to 30. A lookup is one popcount against the prefix mask, so
//! π(k) is O(1) for any k up to the bound.
//!
//! The primes 2, 3 and 5 have no residue bit; they are folded into the
//! running counts past the first window and special-cased inside it.

use crate::stdx::bit_sieve240::{set_bit, unset_larger};
use crate::tables::{odd_prime_bitmap, for_each_odd_prime, PI_TINY};

/// Dense π(k) lookup for `0 <= k <= limit`. Immutable after construction.
pub struct PiTable {
    counts: Vec<u64>,
    bits: Vec<u64>,
    limit: u64,
}

impl PiTable {
    /// Builds the oracle for `[0, limit]`.
    pub fn new(limit: u64) -> Self {
        let words = (limit / 240 + 1) as usize;
        let mut bits = vec![0u64; words];
        if limit >= 7 {
            let odd = odd_prime_bitmap(limit);
            for_each_odd_prime(&odd, limit, |p| {
                if p >= 7 {
                    bits[(p / 240) as usize] |= set_bit(p);
                }
            });
        }
        let mut counts = vec![0u64; words];
        for w in 1..words {
            counts[w] = counts[w - 1]
                + bits[w - 1].count_ones() as u64
                + if w == 1 { 3 } else { 0 };
        }
        Self { counts, bits, limit }
    }

    /// Highest k this table answers.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// π(k): the number of primes `<= k`.
    #[inline]
    pub fn pi(&self, k: u64) -> i64 {
        debug_assert!(k <= self.limit, "pi({k}) beyond table limit {}", self.limit);
        if k < 7 {
            return PI_TINY[k as usize];
        }
        let w = (k / 240) as usize;
        let count = self.counts[w]
            + (self.bits[w] & unset_larger(k)).count_ones() as u64
            + if w == 0 { 3 } else { 0 };
        count as i64
    }
}
