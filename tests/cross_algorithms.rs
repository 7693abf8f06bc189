//! Cross-algorithm consistency: every algorithm counts the same primes.

use primepi::{pi_with, Algorithm};

const ALL: [Algorithm; 8] = [
    Algorithm::Legendre,
    Algorithm::Meissel,
    Algorithm::Lehmer,
    Algorithm::Lmo,
    Algorithm::DelegliseRivat1,
    Algorithm::DelegliseRivat2,
    Algorithm::DelegliseRivat3,
    Algorithm::Gourdon,
];

#[test]
fn all_algorithms_agree_on_a_sweep() {
    // Mix of smooth values, primes, prime+-1 and awkward parameters.
    for &x in &[
        0i64, 1, 2, 3, 99, 100, 101, 1_009, 30_030, 65_537, 100_000, 999_983, 1_000_000,
        1_048_576, 2_000_003,
    ] {
        let reference = pi_with(Algorithm::DelegliseRivat1, x, 1);
        for alg in ALL {
            assert_eq!(pi_with(alg, x, 2), reference, "{alg:?} at x = {x}");
        }
    }
}

#[test]
fn fast_engines_agree_at_ten_million() {
    let reference = pi_with(Algorithm::DelegliseRivat1, 10_000_000, 1);
    assert_eq!(reference, 664_579);
    for alg in [
        Algorithm::Lmo,
        Algorithm::DelegliseRivat2,
        Algorithm::DelegliseRivat3,
        Algorithm::Gourdon,
    ] {
        assert_eq!(pi_with(alg, 10_000_000, 4), reference, "{alg:?}");
    }
}

#[test]
fn gourdon_equals_lmo_at_one_billion() {
    let lmo = pi_with(Algorithm::Lmo, 1_000_000_000, 4);
    let gourdon = pi_with(Algorithm::Gourdon, 1_000_000_000, 4);
    assert_eq!(lmo, 50_847_534);
    assert_eq!(gourdon, lmo);
}

#[test]
fn monotonicity_with_prime_steps() {
    // pi(x+1) - pi(x) is 1 exactly at primes, else 0.
    let mut previous = pi_with(Algorithm::Meissel, 9_990, 1);
    for x in 9_991..=10_100i64 {
        let current = pi_with(Algorithm::Meissel, x, 1);
        let step = current - previous;
        assert!(step == 0 || step == 1, "x = {x}");
        let is_prime = x >= 2 && (2..x).take_while(|d| d * d <= x).all(|d| x % d != 0);
        assert_eq!(step == 1, is_prime, "x = {x}");
        previous = current;
    }
}
