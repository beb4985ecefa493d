//! In-memory repository, used by tests and one-shot computations.

use std::collections::HashMap;

use pass_core::entities::{User, UserRecord};

use crate::error::StoreError;
use crate::repository::{Repository, check_append_only};

#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    users: Vec<User>,
    records: HashMap<String, UserRecord>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.clone())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    fn put_user(&mut self, user: &User) -> Result<(), StoreError> {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => self.users.push(user.clone()),
        }
        Ok(())
    }

    fn remove_user(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        Ok(self.users.len() != before)
    }

    fn load_record(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.get(user_id).cloned())
    }

    fn save_record(&mut self, record: &UserRecord) -> Result<(), StoreError> {
        if let Some(stored) = self.records.get(&record.user_id) {
            check_append_only(&record.user_id, &stored.history, &record.history)?;
        }
        self.records.insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    fn remove_record(&mut self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.remove(user_id).is_some())
    }
}
