//! tz-logging: NDJSON game event log.
//!
//! Events are appended to the file named by `logging.events_path`, one
//! session per run; each line is one versioned event.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bumped whenever an event struct changes shape.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

pub const RULESET_ID: &str = "tenzies_10d6_v1";

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Session id: start time in ms plus a short hash of the process id.
pub fn new_session_id() -> String {
    let ts = now_ms();
    let h = blake3::hash(format!("{ts}:{}", std::process::id()).as_bytes()).to_hex();
    format!("{ts}-{}", &h.as_str()[..8])
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub schema_version: u32,
    pub ruleset_id: &'static str,
    pub app_version: &'static str,
}

impl Default for VersionInfoV1 {
    fn default() -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            ruleset_id: RULESET_ID,
            app_version: VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStartEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub seed: Option<u64>,
    pub config_hash: Option<String>,
    pub best_rolls: Option<u32>,
    pub best_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub roll_count: u32,
    pub dice: [u8; 10],
    pub held: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub die_id: u64,
    pub held: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WinEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub rolls: u32,
    pub time_s: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestScoreEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub prev_rolls: Option<u32>,
    pub prev_time: Option<u32>,
    pub rolls: u32,
    pub time_s: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreErrorEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub session_id: String,
    pub msg: String,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&WinEventV1 {
            event: "win",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: "s".to_string(),
            rolls: 5,
            time_s: 18,
        })
        .unwrap();
        w.write_event(&RollEventV1 {
            event: "roll",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            session_id: "s".to_string(),
            roll_count: 1,
            dice: [1, 2, 3, 4, 5, 6, 1, 2, 3, 4],
            held: 0,
        })
        .unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["event"], "win");
        assert_eq!(vals[0]["rolls"], 5);
        assert_eq!(vals[0]["v"]["schema_version"], EVENT_SCHEMA_VERSION);
        assert_eq!(vals[1]["dice"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn periodic_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();
        w.write_event(&StoreErrorEventV1 {
            event: "store_error",
            ts_ms: 0,
            v: VersionInfoV1::default(),
            session_id: "s".to_string(),
            msg: "disk full".to_string(),
        })
        .unwrap();

        // No explicit flush.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["msg"], "disk full");
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            #[derive(Serialize)]
            struct E {
                event: &'static str,
                x: u32,
            }
            w.write_event(&E { event: "e", x: 1 }).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"e","x":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["x"], 1);
    }

    #[test]
    fn config_hash_is_stable_hex() {
        let a = hash_config_bytes(b"timer:\n  period_ms: 1000\n");
        let b = hash_config_bytes(b"timer:\n  period_ms: 1000\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_config_bytes(b"{}"));
    }

    #[test]
    fn session_ids_are_prefixed_by_time() {
        let id = new_session_id();
        let (ts, tail) = id.split_once('-').unwrap();
        assert!(ts.parse::<u64>().is_ok());
        assert_eq!(tail.len(), 8);
    }
}
