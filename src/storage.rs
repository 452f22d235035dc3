//! Persistence of the day history.

#[cfg(test)]
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use dirs_next as dirs;

use crate::workout::DayHistory;

const FILE: &str = "sisyphus_lifts_history.json";

#[derive(Debug)]
pub enum StorageError {
    NoConfigDir,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NoConfigDir => write!(f, "no configuration directory available"),
            StorageError::Io(e) => write!(f, "history file error: {e}"),
            StorageError::Json(e) => write!(f, "history encoding error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::NoConfigDir => None,
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Whole-snapshot storage for the day history.
pub trait HistoryStore {
    /// Read the stored history. Anything unreadable yields an empty history.
    fn load(&self) -> DayHistory;

    /// Replace the stored history with `history`.
    fn save(&self, history: &DayHistory) -> Result<(), StorageError>;
}

/// History kept as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store in the user's configuration directory.
    pub fn in_config_dir() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn try_load(&self) -> Result<Option<DayHistory>, StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoConfigDir)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> DayHistory {
        match self.try_load() {
            Ok(Some(history)) => {
                log::info!("Loaded history with {} days", history.len());
                history
            }
            Ok(None) => DayHistory::new(),
            Err(e) => {
                log::warn!("Ignoring stored history: {e}");
                DayHistory::new()
            }
        }
    }

    fn save(&self, history: &DayHistory) -> Result<(), StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoConfigDir)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(history)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// In-memory store.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: RefCell<DayHistory>,
    saves: Cell<usize>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_history(history: DayHistory) -> Self {
        Self {
            history: RefCell::new(history),
            saves: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> DayHistory {
        self.history.borrow().clone()
    }

    /// Number of `save` calls so far.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

#[cfg(test)]
impl HistoryStore for MemoryStore {
    fn load(&self) -> DayHistory {
        self.history.borrow().clone()
    }

    fn save(&self, history: &DayHistory) -> Result<(), StorageError> {
        *self.history.borrow_mut() = history.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WeightUnit;
    use crate::workout::{ExerciseEntry, WorkoutSet};

    fn sample() -> DayHistory {
        let mut entry = ExerciseEntry::new("Squat");
        entry.sets.push(WorkoutSet {
            id: "1".into(),
            reps: Some(5),
            weight: Some(100.0),
            unit: WeightUnit::Kg,
        });
        let mut history = DayHistory::new();
        history.insert("2025-02-03".into(), vec![entry]);
        history
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join(FILE));
        store.save(&sample()).unwrap();
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(FILE));
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE);
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load().is_empty());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_without_path_fails() {
        let store = JsonFileStore { path: None };
        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, StorageError::NoConfigDir));
        assert!(store.load().is_empty());
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryStore::default();
        store.save(&sample()).unwrap();
        store.save(&sample()).unwrap();
        assert_eq!(store.saves(), 2);
        assert_eq!(store.snapshot(), sample());
    }
}
