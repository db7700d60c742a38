//! Local answer storage.
//!
//! The store is the device replica. Every write is persisted before the call
//! returns. Flows that write many answers at once go through
//! [`AnswerStore::upsert_all`] so a file-backed store rewrites its file once.

use crate::error::{StoreError, StoreResult};
use answer_engine::{AnswerSet, AnswerSnapshot, Error};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable local answer storage.
pub trait AnswerStore: Send + Sync {
    /// Load all answers. A store with no data yields the empty set.
    fn load(&self) -> StoreResult<AnswerSet>;

    /// Insert or overwrite one answer and persist it.
    fn upsert(&self, question_id: &str, answer_text: &str) -> StoreResult<()>;

    /// Insert or overwrite every answer in `answers`.
    fn upsert_all(&self, answers: &AnswerSet) -> StoreResult<()> {
        for (question_id, answer_text) in answers {
            self.upsert(question_id, answer_text)?;
        }
        Ok(())
    }

    /// Number of stored answers.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.load()?.len())
    }
}

impl<T: AnswerStore + ?Sized> AnswerStore for &T {
    fn load(&self) -> StoreResult<AnswerSet> {
        (**self).load()
    }

    fn upsert(&self, question_id: &str, answer_text: &str) -> StoreResult<()> {
        (**self).upsert(question_id, answer_text)
    }

    fn upsert_all(&self, answers: &AnswerSet) -> StoreResult<()> {
        (**self).upsert_all(answers)
    }
}

/// Answer store backed by a JSON file.
///
/// The file holds `[{"questionId", "answerText"}]`. Writes go to a sibling
/// temporary file which is then renamed over the original.
#[derive(Debug)]
pub struct FileAnswerStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAnswerStore {
    /// Create a store at the given path. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<AnswerSet> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AnswerSet::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        Ok(AnswerSnapshot::from_json(&json)?.into_set()?)
    }

    fn write(&self, answers: &AnswerSet) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let json = AnswerSnapshot::from_set(answers).to_json_pretty()?;
        let tmp = self.tmp_path();
        let replaced = write_synced(&tmp, json.as_bytes())
            .map_err(|e| StoreError::io(&tmp, e))
            .and_then(|()| {
                fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
            });

        if replaced.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        replaced
    }

    /// Apply `answers` under the write lock, writing the file at most once.
    fn apply(&self, answers: &AnswerSet) -> StoreResult<()> {
        if answers.keys().any(|id| id.is_empty()) {
            return Err(Error::EmptyQuestionId.into());
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut stored = self.read()?;
        let mut changed = 0usize;
        for (question_id, answer_text) in answers {
            if stored.get(question_id) != Some(answer_text.as_str()) {
                stored.insert(question_id.clone(), answer_text.clone());
                changed += 1;
            }
        }
        if changed == 0 {
            return Ok(());
        }
        self.write(&stored)?;

        tracing::trace!(changed, path = %self.path.display(), "Answers persisted");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl AnswerStore for FileAnswerStore {
    fn load(&self) -> StoreResult<AnswerSet> {
        self.read()
    }

    fn upsert(&self, question_id: &str, answer_text: &str) -> StoreResult<()> {
        let mut single = AnswerSet::new();
        single.insert(question_id, answer_text);
        self.apply(&single)
    }

    fn upsert_all(&self, answers: &AnswerSet) -> StoreResult<()> {
        self.apply(answers)
    }
}

/// Write `bytes` to `path` and flush them to disk.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Answer store held in memory.
#[derive(Debug, Default)]
pub struct MemoryAnswerStore {
    answers: Mutex<AnswerSet>,
}

impl MemoryAnswerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given answers.
    pub fn with_answers(answers: AnswerSet) -> Self {
        Self {
            answers: Mutex::new(answers),
        }
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn load(&self) -> StoreResult<AnswerSet> {
        Ok(self.answers.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn upsert(&self, question_id: &str, answer_text: &str) -> StoreResult<()> {
        if question_id.is_empty() {
            return Err(Error::EmptyQuestionId.into());
        }
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(question_id, answer_text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileAnswerStore::new(dir.path().join("answers.json"));

        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn upsert_persists_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answers.json");
        let store = FileAnswerStore::new(&path);

        store.upsert("q1", "Faith").unwrap();
        store.upsert("q2", "Hope").unwrap();
        store.upsert("q1", "Faith and hope").unwrap();

        // A fresh instance reads what the first one wrote.
        let reopened = FileAnswerStore::new(&path);
        let answers = reopened.load().unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("q1"), Some("Faith and hope"));
        assert_eq!(answers.get("q2"), Some("Hope"));
    }

    #[test]
    fn upsert_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileAnswerStore::new(dir.path().join("answers.json"));

        store.upsert("q1", "Faith").unwrap();
        store.upsert("q1", "Faith").unwrap();

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn stored_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answers.json");
        let store = FileAnswerStore::new(&path);
        store.upsert("q1", "Faith").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([{"questionId": "q1", "answerText": "Faith"}])
        );
        assert!(!dir.path().join("answers.json.tmp").exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FileAnswerStore::new(dir.path().join("profile").join("answers.json"));

        store.upsert("q1", "Faith").unwrap();
        assert_eq!(store.load().unwrap().get("q1"), Some("Faith"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "{ not an array").unwrap();

        let store = FileAnswerStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(StoreError::Engine(Error::InvalidSnapshot(_)))
        ));
        // Writes must not clobber data the store could not read.
        assert!(store.upsert("q1", "Faith").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not an array");
    }

    #[test]
    fn empty_question_id_rejected() {
        let dir = tempdir().unwrap();
        let store = FileAnswerStore::new(dir.path().join("answers.json"));
        assert!(matches!(
            store.upsert("", "Faith"),
            Err(StoreError::Engine(Error::EmptyQuestionId))
        ));

        let memory = MemoryAnswerStore::new();
        assert!(memory.upsert("", "Faith").is_err());
    }

    #[test]
    fn unwritable_location_is_surfaced() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = FileAnswerStore::new(blocker.join("answers.json"));
        assert!(matches!(
            store.upsert("q1", "Faith"),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn upsert_all_writes_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answers.json");
        let store = FileAnswerStore::new(&path);
        store.upsert("q0", "kept").unwrap();

        let batch: AnswerSet = (1..=3000)
            .map(|i| (format!("q{i}"), format!("answer {i}")))
            .collect();
        store.upsert_all(&batch).unwrap();

        let answers = FileAnswerStore::new(&path).load().unwrap();
        assert_eq!(answers.len(), 3001);
        assert_eq!(answers.get("q0"), Some("kept"));
        assert_eq!(answers.get("q3000"), Some("answer 3000"));
    }

    #[test]
    fn upsert_all_rejects_whole_batch() {
        let dir = tempdir().unwrap();
        let store = FileAnswerStore::new(dir.path().join("answers.json"));

        let batch: AnswerSet = [("q1", "Faith"), ("", "orphan")].into_iter().collect();
        assert!(matches!(
            store.upsert_all(&batch),
            Err(StoreError::Engine(Error::EmptyQuestionId))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answers.json");
        // A directory in the way makes the rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        let store = FileAnswerStore::new(&path);
        let answers: AnswerSet = [("q1", "Faith")].into_iter().collect();

        assert!(matches!(store.write(&answers), Err(StoreError::Io { .. })));
        assert!(!dir.path().join("answers.json.tmp").exists());
    }

    #[test]
    fn memory_store() {
        let store = MemoryAnswerStore::with_answers([("q1", "Faith")].into_iter().collect());
        store.upsert("q2", "Hope").unwrap();

        let answers = store.load().unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }
}
