//! Gourdon-style prime counting.
//!
//! The Gourdon core here is the A + C machinery in [`ac`]: a segmented π
//! table walked in windows, clustered runs cut at window boundaries, and
//! the per-window b-ranges derived from the x/low and x/high clamps.
//!
//! [`pi_gourdon`] composes π(x) by driving that machinery inside the
//! Meissel identity shared with the Deléglise–Rivat path: the σ/Φ₀/B/D
//! collaborators of the full Gourdon identity are external services, so
//! the composer keeps the identity whose remaining terms live in this
//! crate. The easy special leaves are resolved through the segmented π
//! table exactly as C2 resolves its leaves; trivial and hard leaves use
//! the shared engines.

pub mod ac;

pub use ac::{ac, x_star_gourdon};

use crate::deleglise_rivat::s2::{s2_sieve, s2_trivial, S2Input};
use crate::progress::Progress;
use crate::stdx::dynamic_schedule::parallel_sum;
use crate::stdx::imath::{iroot, isqrt, next_power_of_2};
use crate::tables::pi_table::PiTable;
use crate::tables::segmented_pi::SegmentedPiTable;
use crate::tables::{count_primes, generate_lpf, generate_moebius, generate_primes};

/// π(x) via the Gourdon-core machinery.
pub fn pi_gourdon(x: i64, threads: usize) -> i64 {
    pi_gourdon_impl(x, threads, &Progress::off())
}

pub(crate) fn pi_gourdon_impl(x: i64, threads: usize, progress: &Progress) -> i64 {
    if x < crate::SIEVE_FLOOR {
        return count_primes(x);
    }

    let alpha = crate::deleglise_rivat::compute_alpha(x as f64, 1500.0);
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

    let input = S2Input { x, y, z, c, primes: &primes, lpf: &lpf, mu: &mu, pi: &pi };
    let trivial = s2_trivial(&input);
    let easy = easy_leaves_segmented(&input, threads, progress);
    let hard = s2_sieve(&input, progress);

    (s1 as i128 + trivial as i128 + easy + hard as i128 + pi_y as i128 - 1 - p2 as i128) as i64
}

/// Clustered and sparse easy leaves, resolved through a segmented π
/// table over the quotient domain [0, y].
///
/// Each window [low, high) handles the leaves whose quotient x/n falls
/// inside it; a clustered run crossing the window boundary is cut at the
/// boundary and resumes in a later window. The b iterations inside one
/// window are independent and go through the dynamic scheduler.
fn easy_leaves_segmented(s: &S2Input<'_>, threads: usize, progress: &Progress) -> i128 {
    let pi_sqrty = s.pi.pi(isqrt(s.y as u64));
    let pi_x13 = s.pi.pi(iroot::<3>(s.x as u128).min(s.y as u64));
    let start_b = s.c.max(pi_sqrty) + 1;
    if start_b > pi_x13 {
        return 0;
    }

    let segment_size = next_power_of_2(isqrt(s.y as u64 + 1)).max(1024);
    let mut seg_pi = SegmentedPiTable::new(s.y as u64, segment_size);
    let mut sum = 0i128;

    while !seg_pi.finished() {
        let low = seg_pi.low().max(1) as i64;
        let high = seg_pi.high() as i64;
        let x_div_low = s.x / low;
        let x_div_high = s.x / high;

        sum += parallel_sum(threads, start_b, pi_x13, || (), |_, b| {
            easy_in_window(s, b, x_div_low, x_div_high, &seg_pi)
        });

        progress.report(seg_pi.high() as i64, s.y + 1);
        seg_pi.next();
    }
    sum
}

fn easy_in_window(
    s: &S2Input<'_>,
    b: i64,
    x_div_low: i64,
    x_div_high: i64,
    seg_pi: &SegmentedPiTable,
) -> i128 {
    let x = s.x;
    let prime = s.primes[b as usize];
    let min_trivial = x / (prime * prime);
    let min_hard = (s.y / prime).max(prime);
    let min_clustered = (isqrt((x / prime) as u64) as i64).max(min_hard);
    let min_sparse = (s.z / prime).max(min_hard);

    // In-window second factors additionally satisfy p_l > x/(p_b * high)
    // and p_l <= x/(p_b * low).
    let window_floor = x_div_high / prime;
    let bound_clustered = min_clustered.max(window_floor);
    let bound_sparse = min_sparse.max(window_floor);

    let upper = min_trivial.min(x_div_low / prime).min(s.y);
    let mut l = s.pi.pi(upper.max(0) as u64);
    if s.primes[l as usize] <= bound_clustered.min(bound_sparse) {
        return 0;
    }
    let mut result = 0i128;

    // Runs of identical pi(x/n) - b + 2 values. Clamping the jump target
    // up to the clustered bound keeps the counted run inside this window
    // (the bound includes the window floor); a cut run resumes in a later
    // window. The jump quotient is < p_l <= y, so the dense table answers
    // it even when the run crosses the window.
    while s.primes[l as usize] > bound_clustered {
        let n = prime as i128 * s.primes[l as usize] as i128;
        let xn = (x as i128 / n) as i64;
        let phi_xn = seg_pi.pi(xn as u64) - b + 2;
        let m = prime as i128 * s.primes[(b + phi_xn - 1) as usize] as i128;
        let xm = ((x as i128 / m) as i64).max(bound_clustered);
        debug_assert!(xm < s.primes[l as usize]);
        let l2 = s.pi.pi(xm as u64);
        result += phi_xn as i128 * (l - l2) as i128;
        l = l2;
    }

    while s.primes[l as usize] > bound_sparse {
        let n = prime as i128 * s.primes[l as usize] as i128;
        let xn = (x as i128 / n) as i64;
        result += (seg_pi.pi(xn as u64) - b + 2) as i128;
        l -= 1;
    }

    result
}
