//! RNG oracle for deterministic random number generation.
//!
//! Every roll the rules make (hit, critical, flee, growth, AI targeting and
//! the enemy head start) goes through [`RngOracle`], so a battle replays
//! exactly given the same seed and the same inputs.

/// Source of random numbers for the battle rules.
///
/// Implementations must be deterministic for a given seed.
pub trait RngOracle {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Percentage roll in `0..=99`.
    fn roll_percent(&mut self) -> u32 {
        self.next_u32() % 100
    }

    /// Succeeds when a percentage roll lands strictly below `percent`.
    ///
    /// `chance(0)` never succeeds and `chance(100)` always does.
    fn chance(&mut self, percent: i32) -> bool {
        (self.roll_percent() as i32) < percent
    }

    /// Value in `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32() % span)
    }

    /// Value in `[0, 1)`.
    fn unit_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

impl<R: RngOracle + ?Sized> RngOracle for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit LCG state, 32-bit output through an xorshift
/// and a state-dependent rotation.
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed list of raw values, then repeats the last one forever.
///
/// Useful to script exact hit, critical and flee outcomes in tests and
/// replays: `SequenceRng::new([59])` makes every percentage roll 59.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Appends more values to the script.
    pub fn push(&mut self, value: u32) {
        self.values.push(value);
    }

    /// Values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let Some(last) = self.values.len().checked_sub(1) else {
            return 0;
        };
        let value = self.values[self.cursor.min(last)];
        self.cursor += 1;
        value
    }
}
