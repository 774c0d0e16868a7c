//! Level progress: best scores, unlocks and one-time notifications
//!
//! [`ProgressStore`] is the persistence contract. Failures inside a store are
//! logged and swallowed, so callers only ever see plain values: a missing
//! best score reads as 0 and a missing level reads as locked.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::level::{LEVELS, Level};

/// Persistence contract for per-level progress
pub trait ProgressStore {
    /// Best recorded score for a level, 0 if none
    fn best_score(&self, level_id: u8) -> u32;

    /// Record `score` if it beats the stored best, otherwise do nothing
    fn save_score(&mut self, level_id: u8, score: u32);

    /// Record that a level has been unlocked
    fn unlock_level(&mut self, level_id: u8);

    fn was_notification_shown(&self, level_id: u8) -> bool;

    fn mark_notification_shown(&mut self, level_id: u8);

    /// Level 1 is always unlocked; level N needs a best score on level N-1
    /// of at least level N's required score.
    fn is_level_unlocked(&self, level_id: u8) -> bool {
        let Ok(level) = Level::by_id(level_id) else {
            return false;
        };
        match level.previous() {
            None => true,
            Some(prev) => self.best_score(prev.id) >= level.required_score,
        }
    }
}

/// Serializable progress record shared by the bundled stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressData {
    pub best_scores: BTreeMap<u8, u32>,
    pub unlocked: BTreeSet<u8>,
    pub notified: BTreeSet<u8>,
}

impl ProgressData {
    /// Returns true if the stored best changed
    fn record_score(&mut self, level_id: u8, score: u32) -> bool {
        let best = self.best_scores.entry(level_id).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }
}

/// In-memory store, used by tests and when no progress file is configured
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    data: ProgressData,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }
}

impl ProgressStore for MemoryProgressStore {
    fn best_score(&self, level_id: u8) -> u32 {
        self.data.best_scores.get(&level_id).copied().unwrap_or(0)
    }

    fn save_score(&mut self, level_id: u8, score: u32) {
        self.data.record_score(level_id, score);
    }

    fn unlock_level(&mut self, level_id: u8) {
        self.data.unlocked.insert(level_id);
    }

    fn was_notification_shown(&self, level_id: u8) -> bool {
        self.data.notified.contains(&level_id)
    }

    fn mark_notification_shown(&mut self, level_id: u8) {
        self.data.notified.insert(level_id);
    }
}

/// Store backed by a JSON file, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
    data: ProgressData,
}

impl JsonProgressStore {
    /// Load progress from `path`. A missing, unreadable or corrupt file starts fresh.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<ProgressData>(&json) {
                Ok(data) => {
                    log::info!(
                        "Loaded progress for {} levels from {}",
                        data.best_scores.len(),
                        path.display()
                    );
                    data
                }
                Err(e) => {
                    log::warn!("Corrupt progress file {}: {}, starting fresh", path.display(), e);
                    ProgressData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No progress found at {}, starting fresh", path.display());
                ProgressData::default()
            }
            Err(e) => {
                log::warn!("Failed to read progress {}: {}, starting fresh", path.display(), e);
                ProgressData::default()
            }
        };
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.data) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode progress: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    log::warn!("Failed to create {}: {}", parent.display(), e);
                    return;
                }
            }
        }
        match fs::write(&self.path, json) {
            Ok(()) => log::debug!("Progress saved to {}", self.path.display()),
            Err(e) => log::warn!("Failed to save progress to {}: {}", self.path.display(), e),
        }
    }
}

impl ProgressStore for JsonProgressStore {
    fn best_score(&self, level_id: u8) -> u32 {
        self.data.best_scores.get(&level_id).copied().unwrap_or(0)
    }

    fn save_score(&mut self, level_id: u8, score: u32) {
        if self.data.record_score(level_id, score) {
            self.persist();
        }
    }

    fn unlock_level(&mut self, level_id: u8) {
        if self.data.unlocked.insert(level_id) {
            log::info!("Level {} unlocked", level_id);
            self.persist();
        }
    }

    fn was_notification_shown(&self, level_id: u8) -> bool {
        self.data.notified.contains(&level_id)
    }

    fn mark_notification_shown(&mut self, level_id: u8) {
        if self.data.notified.insert(level_id) {
            self.persist();
        }
    }
}

/// Level-select entry
#[derive(Debug, Clone, Serialize)]
pub struct LevelStatus {
    pub level: Level,
    pub unlocked: bool,
    pub best_score: u32,
}

/// Every level with its unlock state and best score, in play order
pub fn level_overview<S: ProgressStore + ?Sized>(store: &S) -> Vec<LevelStatus> {
    LEVELS
        .iter()
        .map(|level| LevelStatus {
            level: *level,
            unlocked: store.is_level_unlocked(level.id),
            best_score: store.best_score(level.id),
        })
        .collect()
}
