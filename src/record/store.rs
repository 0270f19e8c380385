use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::record::model::GameRecord;

/// Where sealed game records go, and where they are read back from.
pub trait GameStore {
    /// Persist a sealed record. Unsealed records and repeated ids are refused.
    fn save(&mut self, record: &GameRecord) -> Result<(), StoreError>;

    /// All stored records, oldest first.
    fn list(&self) -> Result<Vec<GameRecord>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError>;

    /// Record at `index` in [`GameStore::list`] order.
    fn get_by_index(&self, index: usize) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.list()?.into_iter().nth(index))
    }

    fn clear(&mut self) -> Result<(), StoreError>;
}

fn check_sealed(record: &GameRecord) -> Result<(), StoreError> {
    if record.is_sealed() {
        Ok(())
    } else {
        Err(StoreError::Unsealed(record.id().to_string()))
    }
}

/// Write `contents` beside `path` and rename it into place, so readers never
/// see a partial file. The temporary file is removed if either step fails.
fn write_then_rename(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    let written = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), %cleanup, "temporary record file left behind");
        }
        return Err(err);
    }
    Ok(())
}

fn sort_oldest_first(records: &mut [GameRecord]) {
    records.sort_by(|a, b| {
        a.started_at()
            .cmp(&b.started_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Keeps records in memory for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn save(&mut self, record: &GameRecord) -> Result<(), StoreError> {
        check_sealed(record)?;
        if self.records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::Duplicate(record.id().to_string()));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut records = self.records.clone();
        sort_oldest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.records.iter().find(|r| r.id() == id).cloned())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}

/// One pretty-printed JSON file per record, `game_<id>.json`, in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    const PREFIX: &'static str = "game_";
    const EXTENSION: &'static str = ".json";

    /// Open (creating if needed) a record directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonDirStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `id`, or `None` if the id could escape the directory.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| {
            self.dir
                .join(format!("{}{}{}", Self::PREFIX, id, Self::EXTENSION))
        })
    }

    fn read_record(path: &Path) -> Result<GameRecord, StoreError> {
        let json = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn record_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(Self::PREFIX) && name.ends_with(Self::EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl GameStore for JsonDirStore {
    #[instrument(skip(self, record), fields(id = record.id()))]
    fn save(&mut self, record: &GameRecord) -> Result<(), StoreError> {
        check_sealed(record)?;
        let path = self
            .path_for(record.id())
            .ok_or_else(|| StoreError::InvalidId(record.id().to_string()))?;
        if path.exists() {
            return Err(StoreError::Duplicate(record.id().to_string()));
        }

        write_then_rename(&path, &serde_json::to_string_pretty(record)?)?;

        info!(path = %path.display(), moves = record.total_moves(), "game record saved");
        Ok(())
    }

    fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut records = self
            .record_files()?
            .iter()
            .map(|path| Self::read_record(path))
            .collect::<Result<Vec<_>, _>>()?;
        sort_oldest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
        match self.path_for(id) {
            Some(path) if path.exists() => Self::read_record(&path).map(Some),
            _ => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        for path in self.record_files()? {
            fs::remove_file(&path)?;
        }
        debug!(dir = %self.dir.display(), "record directory cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, Position, Variant};
    use chrono::{Duration, Utc};

    fn sealed_record(offset_secs: i64) -> GameRecord {
        let started_at = Utc::now() + Duration::seconds(offset_secs);
        let mut record = GameRecord::new(Variant::Cube.size(), Player::Yellow, started_at);
        record.push_move(Player::Yellow, Position::new(0, 0, 0), String::new());
        record.seal(None, Utc::now());
        record
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let record = sealed_record(0);
        store.save(&record).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(record.id()).unwrap(), Some(record.clone()));
        assert_eq!(store.get_by_index(0).unwrap(), Some(record));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_unsealed_record_is_refused() {
        let mut store = MemoryStore::new();
        let record = GameRecord::new(Variant::Cube.size(), Player::Yellow, Utc::now());
        assert!(matches!(store.save(&record), Err(StoreError::Unsealed(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_dir_store_save_list_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path().join("games")).unwrap();

        let newer = sealed_record(10);
        let older = sealed_record(0);
        store.save(&newer).unwrap();
        store.save(&older).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![older.clone(), newer.clone()]);
        assert_eq!(store.get(newer.id()).unwrap(), Some(newer.clone()));
        assert_eq!(store.get_by_index(1).unwrap(), Some(newer));
        assert!(store
            .dir()
            .join(format!("game_{}.json", older.id()))
            .exists());
    }

    #[test]
    fn test_json_dir_store_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path()).unwrap();
        let record = sealed_record(0);
        store.save(&record).unwrap();
        assert!(matches!(store.save(&record), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn test_json_dir_store_ignores_unsafe_ids_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        assert_eq!(store.get("../etc/passwd").unwrap(), None);
        assert!(store.list().unwrap().is_empty());

        store.save(&sealed_record(0)).unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("game_broken.json"), "{ not json").unwrap();

        let err = store.get("broken").unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got {err}");
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("game_blocked.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inside"), "x").unwrap();

        assert!(write_then_rename(&target, "{}").is_err());
        assert!(!dir.path().join("game_blocked.json.tmp").exists());
        assert!(target.is_dir());
    }
}
