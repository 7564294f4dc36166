//! Xorshift-style bit diffusion on `u64`.
//!
//! All shifts are on unsigned 64-bit words, so bits shifted past either
//! end are discarded and no arithmetic can overflow.

/// XORs every value together. The fold of an empty slice is zero.
#[inline]
pub fn xor_fold(values: &[u64]) -> u64 {
    values.iter().fold(0, |acc, &v| acc ^ v)
}

/// One three-step xorshift pass (>> 17, << 5, >> 13).
#[inline]
pub fn xorshift(mut x: u64) -> u64 {
    x ^= x >> 17;
    x ^= x << 5;
    x ^= x >> 13;
    x
}

/// `passes` repetitions of the five-step pass (>> 17, << 5, >> 13, << 7, >> 11).
#[inline]
pub fn mix_rounds(mut x: u64, passes: usize) -> u64 {
    for _ in 0..passes {
        x ^= x >> 17;
        x ^= x << 5;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 11;
    }
    x
}
