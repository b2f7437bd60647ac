//! Mulberry32 seeded generator
//!
//! A 32-bit state generator whose output stream is fixed for a given seed on
//! every platform. It is NOT cryptographically secure.

use rand::RngCore;

const GOLDEN_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self { Self { state: seed } }

    /// Builds a generator from any integer seed, keeping only its low 32 bits.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn from_i64(seed: i64) -> Self { Self::new(seed as u32) }

    pub const fn state(&self) -> u32 { self.state }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`. The division by 2^32 is exact in `f64`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 { f64::from(self.next_u32()) / TWO_POW_32 }

    /// Uniform-ish index in `0..bound`, computed as `floor(next_f64() * bound)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn next_index(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64).floor() as usize
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 { Mulberry32::next_u32(self) }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(Mulberry32::next_u32(self));
        let hi = u64::from(Mulberry32::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = Mulberry32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
