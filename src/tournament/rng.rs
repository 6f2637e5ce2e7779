//! Deterministic PRNG for bots and seeded games.

/// Deterministic PRNG using xorshift64.
///
/// Same seed, same sequence, on every platform. Not for cryptographic use.
#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Derive an independent stream for `player` within one game.
    #[must_use]
    pub const fn for_player(seed: u64, player: u8) -> Self {
        // splitmix-style scramble so neighbouring seeds do not correlate
        let mut z = seed ^ ((player as u64) << 56);
        z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::new(z ^ (z >> 31))
    }

    /// Generate next random u64.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random index in `[0, len)`; 0 when `len` is 0.
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        // len <= usize::MAX fits u64 on every supported target
        #[allow(clippy::cast_possible_truncation)]
        let idx = (self.next_u64() % len as u64) as usize;
        idx
    }
}
