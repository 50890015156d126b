//! Greedy auto-player: chase the most common face.

use crate::chance::DiceSource;
use crate::engine;
use crate::state::{DieId, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub rolls: u32,
    pub won: bool,
}

/// Face to collect: the most frequent one, ties to the higher face.
///
/// Held dice already commit to a face, so they count double.
pub fn target_value(state: &GameState) -> u8 {
    let mut score = [0u32; 7];
    for d in &state.dice {
        score[d.value as usize] += if d.held { 2 } else { 1 };
    }
    // max_by_key keeps the last maximum, i.e. the higher face on ties.
    (1..=6u8).max_by_key(|&v| score[v as usize]).unwrap_or(6)
}

/// Dice whose hold flag should flip to move toward the target face.
pub fn choose_holds(state: &GameState) -> Vec<DieId> {
    let target = target_value(state);
    state
        .dice
        .iter()
        .filter(|d| d.held != (d.value == target))
        .map(|d| d.id)
        .collect()
}

/// Play one game from a fresh deal until won or `max_rolls` is reached.
pub fn play_game(src: &mut impl DiceSource, max_rolls: u32) -> GameOutcome {
    let mut s = engine::new_game(src);
    loop {
        for id in choose_holds(&s) {
            s = engine::hold(&s, id);
        }
        if s.is_won() || s.roll_count >= max_rolls {
            return GameOutcome {
                rolls: s.roll_count,
                won: s.is_won(),
            };
        }
        s = engine::roll(&s, src);
    }
}
