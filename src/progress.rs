//! Per-level best results
//!
//! One record per level: best stars (never downgraded), attempts of the most
//! recent win, and whether the level was ever completed. Persisted to
//! LocalStorage on the web; held in memory elsewhere.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Result record for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Level number (1-based)
    pub level: usize,
    /// Best stars earned (0-3)
    pub stars: u8,
    /// Attempts used on the last recorded win
    pub attempts: u32,
    pub completed: bool,
}

impl LevelProgress {
    pub fn new(level: usize, stars: u8, attempts: u32) -> Self {
        Self {
            level,
            stars,
            attempts,
            completed: stars > 0,
        }
    }
}

/// All levels' records, keyed by level number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressBook {
    pub levels: BTreeMap<usize, LevelProgress>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a new result: stars only go up, completion sticks
    ///
    /// Returns the record as stored.
    pub fn record(&mut self, result: LevelProgress) -> LevelProgress {
        let merged = match self.levels.get(&result.level) {
            Some(existing) => LevelProgress {
                level: result.level,
                stars: existing.stars.max(result.stars),
                attempts: result.attempts,
                completed: existing.completed || result.completed,
            },
            None => result,
        };
        self.levels.insert(merged.level, merged);
        merged
    }

    pub fn get(&self, level: usize) -> Option<&LevelProgress> {
        self.levels.get(&level)
    }

    /// Best stars for a level (0 when never played)
    pub fn stars(&self, level: usize) -> u8 {
        self.get(level).map(|p| p.stars).unwrap_or(0)
    }

    pub fn reset_level(&mut self, level: usize) {
        self.levels.remove(&level);
    }

    pub fn reset_all(&mut self) {
        self.levels.clear();
    }

    pub fn total_stars(&self) -> u32 {
        self.levels.values().map(|p| p.stars as u32).sum()
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where level results live between sessions
pub trait ProgressStore {
    fn load(&self, level: usize) -> GameResult<Option<LevelProgress>>;

    /// Merge and persist a result
    fn record(&mut self, result: &LevelProgress) -> GameResult<()>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub book: ProgressBook,
}

impl ProgressStore for MemoryStore {
    fn load(&self, level: usize) -> GameResult<Option<LevelProgress>> {
        Ok(self.book.get(level).copied())
    }

    fn record(&mut self, result: &LevelProgress) -> GameResult<()> {
        self.book.record(*result);
        Ok(())
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "vertex_pop_progress";

    fn storage() -> GameResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Persistence("LocalStorage unavailable".into()))
    }

    fn read_book() -> GameResult<ProgressBook> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => ProgressBook::from_json(&json),
            Ok(None) => Ok(ProgressBook::new()),
            Err(e) => Err(GameError::Persistence(format!("{e:?}"))),
        }
    }

    fn write_book(book: &ProgressBook) -> GameResult<()> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &book.to_json()?)
            .map_err(|e| GameError::Persistence(format!("{e:?}")))
    }

    /// Forget one level's result
    pub fn reset_level(&mut self, level: usize) -> GameResult<()> {
        let mut book = Self::read_book()?;
        book.reset_level(level);
        Self::write_book(&book)
    }

    /// Forget every result
    pub fn reset_all(&mut self) -> GameResult<()> {
        Self::write_book(&ProgressBook::new())
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStore for LocalStorageStore {
    fn load(&self, level: usize) -> GameResult<Option<LevelProgress>> {
        Ok(Self::read_book()?.get(level).copied())
    }

    fn record(&mut self, result: &LevelProgress) -> GameResult<()> {
        let mut book = Self::read_book()?;
        let stored = book.record(*result);
        Self::write_book(&book)?;
        log::info!(
            "Progress saved for level {}: {} stars",
            stored.level,
            stored.stars
        );
        Ok(())
    }
}

/// Store that rejects everything (exercises the session's error paths)
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl ProgressStore for UnavailableStore {
    fn load(&self, _level: usize) -> GameResult<Option<LevelProgress>> {
        Err(GameError::Persistence("store unavailable".into()))
    }

    fn record(&mut self, _result: &LevelProgress) -> GameResult<()> {
        Err(GameError::Persistence("store unavailable".into()))
    }
}
