// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Stateful `xoroshiro128+` generator for reproducible scenario setup.
///
/// * Not cryptographically secure.
/// * Identical seeds yield identical sequences on every supported platform,
///   so two peers that spawn bodies from the same seed build the same world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prng {
    state: [u64; 2],
}

impl Prng {
    const FALLBACK_STATE: u64 = 0x9e37_79b9_7f4a_7c15;

    /// Expands a single 64-bit seed into generator state with SplitMix64.
    pub fn from_seed_u64(seed: u64) -> Self {
        fn splitmix64(state: &mut u64) -> u64 {
            *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = *state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            z ^ (z >> 31)
        }

        let mut sm = seed;
        let mut state = [splitmix64(&mut sm), splitmix64(&mut sm)];
        // An all-zero state would emit zeros forever.
        if state == [0, 0] {
            state[0] = Self::FALLBACK_STATE;
        }
        Self { state }
    }

    /// Returns the next raw 64-bit output.
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.state[1] = s1.rotate_left(36);

        result
    }

    /// Returns the next float in `[0, 1)` built from the top 23 output bits.
    pub fn next_f32(&mut self) -> f32 {
        let mantissa = u32::try_from(self.next_u64() >> 41).unwrap_or(0);
        f32::from_bits(mantissa | 0x3f80_0000) - 1.0
    }

    /// Returns the next float in `[min, max)`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}
