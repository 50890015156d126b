//! Game controller: owns the state, the timer task and the best score.
//!
//! User actions and timer polls go through `apply`, which compares the phase
//! before and after each transition and runs the side effects of entering or
//! leaving a phase: start/cancel the timer, record the win, update the best
//! score, queue the win announcement.

use std::time::{Duration, Instant};

use crate::best::BestScore;
use crate::chance::DiceSource;
use crate::engine;
use crate::state::{DieId, GameState, Phase, NUM_DICE};
use crate::store::BestScoreStore;
use crate::timer::TickTimer;

/// Things that happened, for the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Rolled {
        roll_count: u32,
        values: [u8; NUM_DICE],
        held: usize,
    },
    Held {
        id: DieId,
        held: bool,
    },
    Reset {
        generation: u64,
    },
    Won {
        rolls: u32,
        time: u32,
    },
    BestScoreUpdated {
        previous: BestScore,
        best: BestScore,
    },
    StoreFailed {
        msg: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieView {
    pub id: DieId,
    pub value: u8,
    pub held: bool,
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub dice: [DieView; NUM_DICE],
    pub roll_count: u32,
    pub elapsed_secs: u32,
    pub best: BestScore,
    pub phase: Phase,
    pub won: bool,
    /// The finished game is the current best.
    pub new_record: bool,
}

impl GameView {
    /// Label of the single roll/new-game trigger.
    pub fn trigger_label(&self) -> &'static str {
        if self.won {
            "New Game"
        } else {
            "Roll"
        }
    }
}

pub fn win_announcement(rolls: u32, time: u32) -> String {
    format!(
        "Congratulations! You won in {rolls} rolls and {time} seconds! Press \"New Game\" to start again."
    )
}

pub struct GameController<S: DiceSource, B: BestScoreStore> {
    state: GameState,
    source: S,
    store: B,
    best: BestScore,
    timer: TickTimer,
    announcement: Option<String>,
    events: Vec<GameEvent>,
}

impl<S: DiceSource, B: BestScoreStore> GameController<S, B> {
    /// Deals the first game and reads the stored best score once.
    pub fn new(mut source: S, store: B, timer_period: Duration) -> Self {
        let state = engine::new_game(&mut source);
        let best = store.load();
        Self {
            state,
            source,
            store,
            best,
            timer: TickTimer::new(timer_period),
            announcement: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best(&self) -> BestScore {
        self.best
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Time until the next clock tick, if the clock runs.
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.until_next(now)
    }

    pub fn view(&self) -> GameView {
        let won = self.state.is_won();
        GameView {
            dice: self.state.dice.map(|d| DieView {
                id: d.id,
                value: d.value,
                held: d.held,
            }),
            roll_count: self.state.roll_count,
            elapsed_secs: self.state.elapsed_secs,
            best: self.best,
            phase: self.state.phase(),
            won,
            new_record: won && self.best.matches(self.state.roll_count, self.state.elapsed_secs),
        }
    }

    /// Roll the unheld dice, or start a new game after a win.
    pub fn roll(&mut self, now: Instant) {
        self.tick(now);
        let was_won = self.state.is_won();
        let next = engine::roll(&self.state, &mut self.source);
        self.apply(next, now);
        if was_won {
            self.events.push(GameEvent::Reset {
                generation: self.state.generation,
            });
        } else {
            self.events.push(GameEvent::Rolled {
                roll_count: self.state.roll_count,
                values: self.state.values(),
                held: self.state.held_count(),
            });
        }
    }

    /// Toggle hold on `id`. Ignored for unknown ids and once the game is won.
    pub fn hold(&mut self, id: DieId, now: Instant) {
        if self.state.is_won() {
            return;
        }
        self.tick(now);
        let next = engine::hold(&self.state, id);
        if next == self.state {
            return;
        }
        if let Some(d) = next.die(id) {
            self.events.push(GameEvent::Held { id, held: d.held });
        }
        self.apply(next, now);
    }

    /// Hold by board position (0-based).
    pub fn hold_index(&mut self, index: usize, now: Instant) {
        if let Some(id) = self.state.dice.get(index).map(|d| d.id) {
            self.hold(id, now);
        }
    }

    /// Start over with fresh dice regardless of phase.
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.announcement = None;
        self.state = engine::reset(&self.state, &mut self.source);
        self.events.push(GameEvent::Reset {
            generation: self.state.generation,
        });
    }

    /// Credit every clock period that elapsed up to `now`.
    pub fn tick(&mut self, now: Instant) {
        let n = self.timer.due(now);
        for _ in 0..n {
            self.state = engine::tick(&self.state);
        }
    }

    /// The live-region win summary. Yields once per win.
    pub fn take_announcement(&mut self) -> Option<String> {
        self.announcement.take()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forget the stored best score.
    pub fn clear_best(&mut self) {
        self.best = BestScore::UNSET;
        if let Err(e) = self.store.clear() {
            self.events.push(GameEvent::StoreFailed { msg: e.to_string() });
        }
    }

    fn apply(&mut self, next: GameState, now: Instant) {
        debug_assert!(engine::validate(&next).is_ok());
        let before = self.state.phase();
        let after = next.phase();
        self.state = next;

        if before != Phase::InProgress && after == Phase::InProgress {
            self.timer.start(now);
        } else if before == Phase::InProgress && after != Phase::InProgress {
            self.timer.cancel();
        }

        if after != Phase::Won {
            self.announcement = None;
        } else if before != Phase::Won {
            self.on_win();
        }
    }

    fn on_win(&mut self) {
        self.timer.cancel();
        let rolls = self.state.roll_count;
        let time = self.state.elapsed_secs;
        self.events.push(GameEvent::Won { rolls, time });
        self.announcement = Some(win_announcement(rolls, time));

        if !self.best.improves_on(rolls, time) {
            return;
        }
        let previous = self.best;
        self.best = BestScore::new(rolls, time);
        self.events.push(GameEvent::BestScoreUpdated {
            previous,
            best: self.best,
        });
        if let Err(e) = self.store.save(&self.best) {
            self.events.push(GameEvent::StoreFailed { msg: e.to_string() });
        }
    }
}
