//! Small, self-contained utilities used across the engine.
//!
//! # Scope
//! `stdx` hosts narrow, allocation-light pieces that back the counting
//! pipeline. They are tuned for predictable memory use and hot-loop fast
//! paths rather than general-purpose ergonomics; nothing here knows about
//! prime counting, the domain modules compose these pieces.
//!
//! # Module map
//! - `imath`: exact integer roots, powers, and wide division helpers.
//! - `bit_sieve240`: 240-integer bit windows over residues coprime to 30.
//! - `counters`: Fenwick counter tree mirroring a sieve segment.
//! - `dynamic_schedule`: relaxed-atomic dynamic loop scheduling.

pub mod bit_sieve240;
pub mod counters;
pub mod dynamic_schedule;
pub mod imath;
