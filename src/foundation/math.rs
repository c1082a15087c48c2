const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Counter-based SplitMix64: the `index`-th output of the stream seeded with `seed`, computed
/// without advancing any shared generator.
pub(crate) fn hash64(seed: u64, index: u64) -> u64 {
    mix64(seed.wrapping_add(index.wrapping_add(1).wrapping_mul(SPLITMIX_GAMMA)))
}

/// Map a uniformly distributed `u64` into `[0, bound)` with a multiply-shift.
pub(crate) fn reduce_u64(x: u64, bound: u64) -> u64 {
    ((u128::from(x) * u128::from(bound)) >> 64) as u64
}

/// FNV-1a 64, seeded.
pub(crate) fn stable_hash64(seed: u64, s: &str) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
