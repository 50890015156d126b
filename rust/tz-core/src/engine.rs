//! Rules engine: pure state transitions.
//!
//! Every function here takes the current state by reference and returns the
//! next one. Win status is always derived from the dice, never stored.

use std::collections::HashSet;

use thiserror::Error;

use crate::chance::DiceSource;
use crate::state::{Die, DieId, GameState, Phase, NUM_DICE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid state: {msg}")]
    InvalidState { msg: &'static str },
}

fn fresh_dice(generation: u64, src: &mut impl DiceSource) -> [Die; NUM_DICE] {
    std::array::from_fn(|i| Die {
        value: src.roll_die(),
        held: false,
        id: DieId::new(generation, i),
    })
}

/// First game of a session.
pub fn new_game(src: &mut impl DiceSource) -> GameState {
    GameState {
        dice: fresh_dice(0, src),
        roll_count: 0,
        elapsed_secs: 0,
        generation: 0,
    }
}

/// Throw away the current dice and counters; mint a new batch of ids.
pub fn reset(state: &GameState, src: &mut impl DiceSource) -> GameState {
    let generation = state.generation.wrapping_add(1);
    GameState {
        dice: fresh_dice(generation, src),
        roll_count: 0,
        elapsed_secs: 0,
        generation,
    }
}

/// Reroll every unheld die and count the roll. On a won board this is `reset`.
pub fn roll(state: &GameState, src: &mut impl DiceSource) -> GameState {
    if state.is_won() {
        return reset(state, src);
    }
    let mut next = *state;
    for die in next.dice.iter_mut().filter(|d| !d.held) {
        die.value = src.roll_die();
    }
    next.roll_count = next.roll_count.saturating_add(1);
    next
}

/// Toggle the hold flag of die `id`. Unknown ids leave the state unchanged.
pub fn hold(state: &GameState, id: DieId) -> GameState {
    let mut next = *state;
    if let Some(die) = next.dice.iter_mut().find(|d| d.id == id) {
        die.held = !die.held;
    }
    next
}

/// One timer period. Only counts while a game is in progress.
pub fn tick(state: &GameState) -> GameState {
    let mut next = *state;
    if state.phase() == Phase::InProgress {
        next.elapsed_secs = next.elapsed_secs.saturating_add(1);
    }
    next
}

pub fn is_won(state: &GameState) -> bool {
    state.is_won()
}

pub fn phase(state: &GameState) -> Phase {
    state.phase()
}

pub fn validate(state: &GameState) -> Result<(), EngineError> {
    for d in &state.dice {
        if !(1..=6).contains(&d.value) {
            return Err(EngineError::InvalidState {
                msg: "dice values must be in 1..=6",
            });
        }
    }
    let ids: HashSet<DieId> = state.dice.iter().map(|d| d.id).collect();
    if ids.len() != NUM_DICE {
        return Err(EngineError::InvalidState {
            msg: "die ids must be unique",
        });
    }
    if state.roll_count == 0 && state.elapsed_secs != 0 {
        return Err(EngineError::InvalidState {
            msg: "clock cannot run before the first roll",
        });
    }
    Ok(())
}
