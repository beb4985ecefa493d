//! JSONL history log.
//!
//! Appends finished sessions to per-user `{history_dir}/{user_id}.jsonl`
//! files with `serde_jsonlines::append_json_lines`, one session per line.
//! Lines are never rewritten.

use std::path::PathBuf;

use pass_core::entities::HistorySession;

use crate::error::StoreError;

pub struct HistoryLog {
    history_dir: PathBuf,
}

impl HistoryLog {
    /// Create a log rooted at `history_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn new(history_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&history_dir)?;
        Ok(Self { history_dir })
    }

    fn path(&self, user_id: &str) -> PathBuf {
        self.history_dir.join(format!("{user_id}.jsonl"))
    }

    /// Append sessions to the user's log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file write fails.
    pub fn append(&self, user_id: &str, sessions: &[HistorySession]) -> Result<(), StoreError> {
        if sessions.is_empty() {
            return Ok(());
        }
        serde_jsonlines::append_json_lines(self.path(user_id), sessions)?;
        Ok(())
    }

    /// All sessions for a user in file order. Empty if there is no log yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on read failure and `StoreError::Other` for a
    /// line that does not decode as a session.
    pub fn read(&self, user_id: &str) -> Result<Vec<HistorySession>, StoreError> {
        let path = self.path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)?
            .collect::<Result<Vec<HistorySession>, _>>()
            .map_err(|e| StoreError::Other(anyhow::Error::new(e).context(format!(
                "malformed history line in {}",
                path.display()
            ))))
    }

    /// Delete the user's log. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be removed.
    pub fn remove(&self, user_id: &str) -> Result<bool, StoreError> {
        let path = self.path(user_id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}
