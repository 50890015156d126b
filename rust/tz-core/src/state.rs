//! Canonical game state: ten dice plus the roll and time counters.

/// Number of dice in play. The array type of `GameState::dice` enforces it.
pub const NUM_DICE: usize = 10;

/// Stable die identifier, unique within a process.
///
/// Ids are `generation * NUM_DICE + index`; a reset bumps the generation so a
/// fresh batch never reuses an id from the previous game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DieId(pub u64);

impl DieId {
    pub fn new(generation: u64, index: usize) -> Self {
        DieId(generation * NUM_DICE as u64 + index as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Die {
    /// Face value in 1..=6.
    pub value: u8,
    pub held: bool,
    pub id: DieId,
}

/// Derived game phase. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No roll yet in this game.
    Idle,
    /// At least one roll, not won.
    InProgress,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub dice: [Die; NUM_DICE],
    pub roll_count: u32,
    pub elapsed_secs: u32,
    /// Batch counter used to mint die ids.
    pub generation: u64,
}

impl GameState {
    /// All dice held and all showing one value.
    pub fn is_won(&self) -> bool {
        let first = self.dice[0].value;
        self.dice.iter().all(|d| d.held) && self.dice.iter().all(|d| d.value == first)
    }

    pub fn phase(&self) -> Phase {
        if self.is_won() {
            Phase::Won
        } else if self.roll_count == 0 {
            Phase::Idle
        } else {
            Phase::InProgress
        }
    }

    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.dice.iter().find(|d| d.id == id)
    }

    pub fn values(&self) -> [u8; NUM_DICE] {
        self.dice.map(|d| d.value)
    }

    pub fn held_count(&self) -> usize {
        self.dice.iter().filter(|d| d.held).count()
    }
}
