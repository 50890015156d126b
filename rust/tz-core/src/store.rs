//! Best score persistence.
//!
//! Reads never fail: absent, unreadable or corrupt data loads as unset.
//! Writes go to a temp file first and are renamed into place.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::best::BestScore;

/// Storage key of the best score record; the file store names its file after it.
pub const BEST_SCORE_KEY: &str = "tenziesBestScore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait BestScoreStore {
    fn load(&self) -> BestScore;
    fn save(&mut self, best: &BestScore) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<T: BestScoreStore + ?Sized> BestScoreStore for Box<T> {
    fn load(&self) -> BestScore {
        (**self).load()
    }

    fn save(&mut self, best: &BestScore) -> Result<(), StoreError> {
        (**self).save(best)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// One JSON file holding the record.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/tenziesBestScore.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{BEST_SCORE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> BestScore {
        let Ok(bytes) = std::fs::read(&self.path) else {
            return BestScore::UNSET;
        };
        serde_json::from_slice::<BestScore>(&bytes).unwrap_or(BestScore::UNSET)
    }

    fn save(&mut self, best: &BestScore) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        let bytes = serde_json::to_vec(best)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store. Counts writes so callers can check write-once behaviour.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: BestScore,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: BestScore) -> Self {
        Self { best, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> BestScore {
        self.best
    }

    fn save(&mut self, best: &BestScore) -> Result<(), StoreError> {
        self.best = *best;
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.best = BestScore::UNSET;
        Ok(())
    }
}
