use crate::patients::domain::RiskLevel;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SHIFT_PROBABILITY: f64 = 0.10;
const TOWARD_LOW_PROBABILITY: f64 = 0.5;

/// A single-step adjustment applied to a baseline risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelShift {
    Hold,
    TowardLow,
    TowardCritical,
}

impl LevelShift {
    /// Shifting past either end of the scale leaves the level unchanged.
    pub const fn apply(self, level: RiskLevel) -> RiskLevel {
        match self {
            Self::Hold => level,
            Self::TowardLow => level.toward_low(),
            Self::TowardCritical => level.toward_critical(),
        }
    }
}

/// Decides, once per assessment, whether the baseline level is nudged.
pub trait ShiftSource {
    fn draw(&mut self) -> LevelShift;
}

impl<S: ShiftSource + ?Sized> ShiftSource for &mut S {
    fn draw(&mut self) -> LevelShift {
        (**self).draw()
    }
}

/// Shifts 10% of assessments, split evenly between the two directions.
#[derive(Debug, Clone)]
pub struct RandomShift<R> {
    rng: R,
}

impl RandomShift<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomShift<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ShiftSource for RandomShift<R> {
    fn draw(&mut self) -> LevelShift {
        if !self.rng.gen_bool(SHIFT_PROBABILITY) {
            LevelShift::Hold
        } else if self.rng.gen_bool(TOWARD_LOW_PROBABILITY) {
            LevelShift::TowardLow
        } else {
            LevelShift::TowardCritical
        }
    }
}

/// Always draws the same shift. `FixedShift(LevelShift::Hold)` disables noise.
#[derive(Debug, Clone, Copy)]
pub struct FixedShift(pub LevelShift);

impl ShiftSource for FixedShift {
    fn draw(&mut self) -> LevelShift {
        self.0
    }
}
