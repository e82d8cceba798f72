//! Counter-based hash random number generator.
//!
//! [`HashRng`] turns the sequence `seed, seed + 1, seed + 2, ...` into well-distributed
//! 32-bit values through [`randhash`]. Every scalar draw consumes exactly one counter tick,
//! so two callers that draw in the same order observe the same values. The generator is
//! plain owned state; nothing is shared between instances.
use rand::RngCore;

/// Hashes a counter value into a well-distributed `u32`.
///
/// Even the plain sequence `0, 1, 2, ...` comes out looking random.
#[inline]
pub fn randhash(seed: u32) -> u32 {
    let mut i = (seed ^ 12_345_391).wrapping_mul(2_654_435_769);
    i ^= (i << 6) ^ (i >> 26);
    i = i.wrapping_mul(2_654_435_769);
    i = i.wrapping_add((i << 5) ^ (i >> 12));
    i
}

/// Scale that maps a hashed `u32` onto `[0, 1]`.
///
/// `u32::MAX as f32` rounds up to `2^32`, so this is exactly `2^-32`.
pub const RSCALE: f32 = 1.0 / u32::MAX as f32;

/// Deterministic generator advancing a counter by one per draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRng {
    counter: u32,
}

impl HashRng {
    /// Creates a generator whose first draw hashes `seed`.
    pub fn new(seed: u32) -> Self {
        Self { counter: seed }
    }

    /// Current counter value, i.e. the input of the next draw.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Draws a float in `[a, b]` by linear scaling of the next hash.
    ///
    /// The upper bound is reachable only when the hash rounds up to `2^32` in `f32`;
    /// callers that need a half-open range clamp the result.
    #[inline]
    pub fn next_f32_in(&mut self, a: f32, b: f32) -> f32 {
        scaled_draw(self, a, b)
    }
}

/// One draw from `rng` scaled linearly onto `[a, b]`.
#[inline]
pub(crate) fn scaled_draw(rng: &mut dyn RngCore, a: f32, b: f32) -> f32 {
    let h = rng.next_u32() as f32;
    (b - a) * h / u32::MAX as f32 + a
}

impl RngCore for HashRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let value = randhash(self.counter);
        self.counter = self.counter.wrapping_add(1);
        value
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
