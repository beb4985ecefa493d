//! File-backed repository.
//!
//! Layout under the root directory:
//! - `users.json`: the user directory, a JSON array in insertion order
//! - `records/{user_id}.json`: progress, results, and the statistics summary
//! - `history/{user_id}.jsonl`: the append-only session log
//!
//! JSON documents are written to a temporary file and renamed into place.
//! A save writes the record document before appending to the history log,
//! and a removal deletes the log first. The log is authoritative: a missing
//! document is rebuilt from it and stale statistics are recomputed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pass_core::entities::{DimensionResult, TestProgress, User, UserRecord, UserStatistics};
use pass_core::history::summarize;
use serde::Serialize;

use crate::error::StoreError;
use crate::history_log::HistoryLog;
use crate::repository::{Repository, check_append_only, validate_id};

const USERS_FILE: &str = "users.json";
const RECORDS_DIR: &str = "records";
const HISTORY_DIR: &str = "history";

/// Record document without its history, which lives in the JSONL log.
#[derive(Serialize)]
struct RecordDocument<'a> {
    user_id: &'a str,
    progress: &'a [TestProgress; 4],
    results: &'a [DimensionResult; 4],
    started_at: Option<DateTime<Utc>>,
    statistics: Option<&'a UserStatistics>,
}

impl<'a> From<&'a UserRecord> for RecordDocument<'a> {
    fn from(record: &'a UserRecord) -> Self {
        Self {
            user_id: &record.user_id,
            progress: &record.progress,
            results: &record.results,
            started_at: record.started_at,
            statistics: record.statistics.as_ref(),
        }
    }
}

pub struct FileRepository {
    root: PathBuf,
    history: HistoryLog,
}

impl FileRepository {
    /// Open (or create) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(root.join(RECORDS_DIR))?;
        let history = HistoryLog::new(root.join(HISTORY_DIR))?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self { root, history })
    }

    fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    fn record_path(&self, user_id: &str) -> PathBuf {
        self.root.join(RECORDS_DIR).join(format!("{user_id}.json"))
    }

    fn write_users(&self, users: &[User]) -> Result<(), StoreError> {
        write_json(&self.users_path(), &users)
    }
}

/// Write pretty JSON via a sibling temp file and rename.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(&tmp, body)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl Repository for FileRepository {
    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let path = self.users_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn put_user(&mut self, user: &User) -> Result<(), StoreError> {
        validate_id(&user.id)?;
        let mut users = self.list_users()?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.write_users(&users)?;
        tracing::debug!(user_id = %user.id, "saved user");
        Ok(())
    }

    fn remove_user(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut users = self.list_users()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.write_users(&users)?;
        tracing::debug!(user_id = %id, "removed user");
        Ok(true)
    }

    fn load_record(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        validate_id(user_id)?;
        let history = self.history.read(user_id)?;
        let path = self.record_path(user_id);
        if !path.exists() {
            if history.is_empty() {
                return Ok(None);
            }
            tracing::warn!(
                user_id,
                sessions = history.len(),
                "record document missing; rebuilding from history log"
            );
            let mut record = UserRecord::new(user_id);
            record.statistics = summarize(&history);
            record.history = history;
            return Ok(Some(record));
        }

        let bytes = std::fs::read(&path)?;
        let mut record: UserRecord = serde_json::from_slice(&bytes)?;
        record.history = history;
        let statistics = summarize(&record.history);
        if record.statistics != statistics {
            tracing::warn!(user_id, "statistics out of step with history log; recomputed");
            record.statistics = statistics;
        }
        Ok(Some(record))
    }

    fn save_record(&mut self, record: &UserRecord) -> Result<(), StoreError> {
        validate_id(&record.user_id)?;
        let stored = self.history.read(&record.user_id)?;
        check_append_only(&record.user_id, &stored, &record.history)?;

        write_json(
            &self.record_path(&record.user_id),
            &RecordDocument::from(record),
        )?;
        let new_sessions = &record.history[stored.len()..];
        self.history.append(&record.user_id, new_sessions)?;
        tracing::debug!(
            user_id = %record.user_id,
            appended = new_sessions.len(),
            "saved record"
        );
        Ok(())
    }

    fn remove_record(&mut self, user_id: &str) -> Result<bool, StoreError> {
        validate_id(user_id)?;
        let had_history = self.history.remove(user_id)?;
        let path = self.record_path(user_id);
        let had_record = path.exists();
        if had_record {
            std::fs::remove_file(path)?;
        }
        Ok(had_record || had_history)
    }
}
