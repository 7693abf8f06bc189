//! Property tests for the φ engine and the π oracles.

use primepi::tables::{count_primes, generate_primes};
use primepi::{phi, pi_with_threads};

use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// phi(x, a) = phi(x, a-1) - phi(x / p_a, a-1)
    #[test]
    fn phi_recurrence(x in 1i64..2_000_000, a in 1i64..60) {
        let primes = generate_primes(300);
        let lhs = phi(x, a, 1);
        let rhs = phi(x, a - 1, 1) - phi(x / primes[a as usize], a - 1, 1);
        prop_assert_eq!(lhs, rhs);
    }

    /// phi(x, 0) counts everything; phi(x, a) = 1 once a >= pi(x).
    #[test]
    fn phi_boundaries(x in 1i64..100_000) {
        prop_assert_eq!(phi(x, 0, 1), x);
        let pix = count_primes(x);
        prop_assert_eq!(phi(x, pix, 1), 1);
        prop_assert_eq!(phi(x, pix + 17, 1), 1);
    }

    /// The closed form and the recursive engine agree for a <= 7.
    #[test]
    fn phi_tiny_closed_form(x in 0i64..10_000_000, a in 0i64..=7) {
        prop_assert_eq!(phi(x, a, 1), primepi::phi::tiny::phi_tiny(x, a));
    }

    /// pi never decreases and steps by at most one.
    #[test]
    fn pi_is_monotone(x in 0i64..500_000) {
        let here = pi_with_threads(x, 1);
        let next = pi_with_threads(x + 1, 1);
        prop_assert!(next == here || next == here + 1);
    }

    /// The fast engine agrees with a direct sieve count.
    #[test]
    fn pi_matches_sieve(x in 0i64..3_000_000) {
        prop_assert_eq!(pi_with_threads(x, 1), count_primes(x));
    }
}
