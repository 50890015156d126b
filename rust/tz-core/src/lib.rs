//! tz-core: Tenzies rules, state transitions, clock, best score and configuration.

pub mod autoplay;
pub mod best;
pub mod chance;
pub mod config;
pub mod controller;
pub mod engine;
pub mod state;
pub mod store;
pub mod timer;

pub use best::BestScore;
pub use chance::{DiceSource, RngDice, ScriptedDice};
pub use config::{Config, ConfigError};
pub use controller::{win_announcement, DieView, GameController, GameEvent, GameView};
pub use engine::EngineError;
pub use state::{Die, DieId, GameState, Phase, NUM_DICE};
pub use store::{BestScoreStore, FileStore, MemoryStore, StoreError, BEST_SCORE_KEY};
pub use timer::TickTimer;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod chance_tests;
