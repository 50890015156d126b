use std::path::Path;

use tz_core::{BestScore, GameEvent};
use tz_logging::{
    now_ms, BestScoreEventV1, HoldEventV1, NdjsonError, NdjsonWriter, ResetEventV1, RollEventV1,
    SessionStartEventV1, StoreErrorEventV1, VersionInfoV1, WinEventV1,
};

/// Writes controller events to the NDJSON event log.
pub struct EventSink {
    w: NdjsonWriter,
    session_id: String,
}

impl EventSink {
    pub fn open(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
        session_id: String,
    ) -> Result<Self, NdjsonError> {
        Ok(Self {
            w: NdjsonWriter::open_append_with_flush(path, flush_every_lines)?,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn session_start(
        &mut self,
        seed: Option<u64>,
        config_hash: Option<String>,
        best: BestScore,
    ) -> Result<(), NdjsonError> {
        self.w.write_event(&SessionStartEventV1 {
            event: "session_start",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: self.session_id.clone(),
            seed,
            config_hash,
            best_rolls: best.rolls,
            best_time: best.time,
        })
    }

    pub fn record(&mut self, ev: &GameEvent) -> Result<(), NdjsonError> {
        let ts_ms = now_ms();
        let v = VersionInfoV1::default();
        let session_id = self.session_id.clone();
        match ev {
            GameEvent::Rolled {
                roll_count,
                values,
                held,
            } => self.w.write_event(&RollEventV1 {
                event: "roll",
                ts_ms,
                v,
                session_id,
                roll_count: *roll_count,
                dice: *values,
                held: *held as u8,
            }),
            GameEvent::Held { id, held } => self.w.write_event(&HoldEventV1 {
                event: "hold",
                ts_ms,
                v,
                session_id,
                die_id: id.0,
                held: *held,
            }),
            GameEvent::Reset { generation } => self.w.write_event(&ResetEventV1 {
                event: "reset",
                ts_ms,
                v,
                session_id,
                generation: *generation,
            }),
            GameEvent::Won { rolls, time } => self.w.write_event(&WinEventV1 {
                event: "win",
                ts_ms,
                v,
                session_id,
                rolls: *rolls,
                time_s: *time,
            }),
            GameEvent::BestScoreUpdated { previous, best } => {
                self.w.write_event(&BestScoreEventV1 {
                    event: "best_score",
                    ts_ms,
                    v,
                    session_id,
                    prev_rolls: previous.rolls,
                    prev_time: previous.time,
                    rolls: best.rolls.unwrap_or_default(),
                    time_s: best.time.unwrap_or_default(),
                })
            }
            GameEvent::StoreFailed { msg } => self.w.write_event(&StoreErrorEventV1 {
                event: "store_error",
                ts_ms,
                v,
                session_id,
                msg: msg.clone(),
            }),
        }
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()
    }
}
