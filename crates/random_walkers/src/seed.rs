//! Deterministic per-walker seed derivation.
//!
//! [`seed_for_walker`] mixes a base seed with a walker's scene index so that every
//! walker can draw from its own independent stream. A walker's path then depends only
//! on the base seed and its index, not on how many draws earlier walkers consumed.

/// Derives the RNG seed for the walker at `index` from `base_seed`.
pub fn seed_for_walker(base_seed: u64, index: usize) -> u64 {
    let i = index as u64;
    let mixed = base_seed ^ i.wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
