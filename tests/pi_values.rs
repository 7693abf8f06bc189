//! End-to-end scenarios against the reference π(x) values.

use primepi::{phi, pi, pi_128, pi_with_threads};

#[test]
fn known_pi_values() {
    assert_eq!(pi(10), 4);
    assert_eq!(pi(100), 25);
    assert_eq!(pi(1_000), 168);
    assert_eq!(pi(10_000), 1_229);
    assert_eq!(pi(1_000_000), 78_498);
    assert_eq!(pi(10_000_000), 664_579);
    assert_eq!(pi(100_000_000), 5_761_455);
}

#[test]
fn pi_of_one_billion() {
    assert_eq!(pi(1_000_000_000), 50_847_534);
}

#[test]
fn pi_around_prime_boundaries() {
    // 999983 is the largest prime below 10^6.
    assert_eq!(pi(999_982), 78_497);
    assert_eq!(pi(999_983), 78_498);
    assert_eq!(pi(1_000_003), 78_499);
}

#[test]
fn phi_of_1000() {
    // Numbers <= 1000 coprime to 2*3*5*7*11, and to the first 8 primes.
    assert_eq!(phi(1000, 5, 1), 207);
    assert_eq!(phi(1000, 8, 1), 170);
}

#[test]
fn pi_128_agrees_with_pi() {
    assert_eq!(pi_128(1_000_000_000).unwrap(), 50_847_534);
}

#[test]
fn determinism_across_thread_counts() {
    let x = 2_000_000_000;
    assert_eq!(pi_with_threads(x, 1), pi_with_threads(x, 8));
}

#[test]
#[ignore = "long-running; run in release mode"]
fn pi_of_ten_billion() {
    assert_eq!(pi(10_000_000_000), 455_052_511);
}

#[test]
#[ignore = "long-running; run in release mode"]
fn pi_of_one_trillion() {
    assert_eq!(pi(1_000_000_000_000), 37_607_912_018);
}

#[test]
#[ignore = "long-running; run in release mode"]
fn determinism_at_hundred_billion() {
    let x = 100_000_000_000;
    assert_eq!(
        primepi::pi_deleglise_rivat2(x, 1),
        primepi::pi_deleglise_rivat2(x, 8)
    );
}
