//! Dice value sources.
//!
//! Every transition that needs fresh faces draws them through `DiceSource`, so
//! tests can script exact outcomes and the game can run on a seeded PRNG.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// Produces one die face in 1..=6 per call.
pub trait DiceSource {
    fn roll_die(&mut self) -> u8;
}

impl<S: DiceSource + ?Sized> DiceSource for &mut S {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

impl<S: DiceSource + ?Sized> DiceSource for Box<S> {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

/// Uniform dice backed by a small PRNG.
#[derive(Debug, Clone)]
pub struct RngDice {
    rng: ChaCha8Rng,
}

impl RngDice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl DiceSource for RngDice {
    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Replays a fixed script of faces, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    script: Vec<u8>,
    pos: usize,
}

impl ScriptedDice {
    /// Panics if `script` is empty or holds a value outside 1..=6.
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        let script = script.into();
        assert!(!script.is_empty(), "dice script must not be empty");
        assert!(
            script.iter().all(|v| (1..=6).contains(v)),
            "dice script values must be in 1..=6"
        );
        Self { script, pos: 0 }
    }

    /// Always rolls `value`.
    pub fn constant(value: u8) -> Self {
        Self::new(vec![value])
    }

    /// Number of faces drawn so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let v = self.script[self.pos % self.script.len()];
        self.pos += 1;
        v
    }
}
