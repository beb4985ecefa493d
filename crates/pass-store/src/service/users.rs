//! User directory operations.

use chrono::Utc;

use pass_core::entities::User;
use pass_core::enums::{AgeGroup, Gender};
use pass_core::ids::{PREFIX_USER, generate_id};

use crate::error::StoreError;
use crate::repository::Repository;
use crate::service::AssessmentService;

/// Attempts at drawing an unused ID before giving up.
const ID_ATTEMPTS: usize = 8;

impl<R: Repository> AssessmentService<R> {
    /// Register a new user with a generated `usr-` ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` for a blank name, and propagates
    /// ID generation and repository failures.
    pub fn create_user(
        &mut self,
        name: &str,
        age: u32,
        gender: Gender,
    ) -> Result<User, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidState("user name must not be empty".into()));
        }

        let existing = self.repo.list_users()?;
        let mut id = None;
        for _ in 0..ID_ATTEMPTS {
            let candidate = generate_id(PREFIX_USER)?;
            if !existing.iter().any(|u| u.id == candidate) {
                id = Some(candidate);
                break;
            }
        }
        let id = id.ok_or_else(|| StoreError::InvalidState("could not allocate a user ID".into()))?;

        let user = User {
            id,
            name: name.to_string(),
            age,
            gender,
            created_at: Utc::now(),
        };
        if user.age_group() == AgeGroup::Unknown {
            tracing::warn!(
                user_id = %user.id,
                age,
                "age outside normative range; scores will be estimated"
            );
        }
        self.repo.put_user(&user)?;
        tracing::debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.repo.list_users()
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn get_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.require_user(user_id)
    }

    /// Change a user's age. The age group follows automatically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn update_user_age(&mut self, user_id: &str, age: u32) -> Result<User, StoreError> {
        let mut user = self.require_user(user_id)?;
        user.age = age;
        self.repo.put_user(&user)?;
        tracing::debug!(user_id, age, group = %user.age_group(), "updated user age");
        Ok(user)
    }

    /// Remove a user together with their record and history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn delete_user(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.require_user(user_id)?;
        // Record first: a failure here leaves the user listed, never an orphaned record.
        self.repo.remove_record(user_id)?;
        self.repo.remove_user(user_id)?;
        tracing::debug!(user_id, "deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRepository;
    use crate::test_support::helpers::test_service;
    use pass_core::entities::UserRecord;
    use pass_core::ids::has_prefix;
    use pass_core::norms::NormativeTable;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_and_fetch_user() {
        let mut svc = test_service();
        let user = svc.create_user("  Ana ", 10, Gender::Female).unwrap();
        assert!(has_prefix(&user.id, PREFIX_USER));
        assert_eq!(user.name, "Ana");
        assert_eq!(user.age_group(), AgeGroup::UpperPrimary);
        assert_eq!(svc.get_user(&user.id).unwrap(), user);
        assert_eq!(svc.list_users().unwrap().len(), 1);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut svc = test_service();
        assert!(matches!(
            svc.create_user("   ", 10, Gender::Male),
            Err(StoreError::InvalidState(_))
        ));
    }

    #[test]
    fn age_update_moves_age_group() {
        let mut svc = test_service();
        let user = svc.create_user("Bo", 9, Gender::Male).unwrap();
        assert_eq!(user.age_group(), AgeGroup::LowerPrimary);
        let updated = svc.update_user_age(&user.id, 13).unwrap();
        assert_eq!(updated.age_group(), AgeGroup::JuniorHigh);
        assert_eq!(svc.get_user(&user.id).unwrap().age, 13);
    }

    /// Memory store whose record removal always fails.
    struct StuckRecords(MemoryRepository);

    impl Repository for StuckRecords {
        fn list_users(&self) -> Result<Vec<User>, StoreError> {
            self.0.list_users()
        }

        fn put_user(&mut self, user: &User) -> Result<(), StoreError> {
            self.0.put_user(user)
        }

        fn remove_user(&mut self, id: &str) -> Result<bool, StoreError> {
            self.0.remove_user(id)
        }

        fn load_record(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
            self.0.load_record(user_id)
        }

        fn save_record(&mut self, record: &UserRecord) -> Result<(), StoreError> {
            self.0.save_record(record)
        }

        fn remove_record(&mut self, _user_id: &str) -> Result<bool, StoreError> {
            Err(StoreError::InvalidState("disk unavailable".to_string()))
        }
    }

    #[test]
    fn failed_record_removal_keeps_the_user() {
        let mut svc = AssessmentService::new(
            StuckRecords(MemoryRepository::new()),
            NormativeTable::builtin(),
        );
        let user = svc.create_user("Lee", 10, Gender::Male).unwrap();
        svc.record_session(&user.id, [70.0; 4], user.age_group(), 1000)
            .unwrap();

        assert!(svc.delete_user(&user.id).is_err());
        assert_eq!(svc.get_user(&user.id).unwrap(), user);
        assert_eq!(svc.history(&user.id, None).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_user_and_record() {
        let mut svc = test_service();
        let user = svc.create_user("Lee", 10, Gender::Male).unwrap();
        svc.record_session(&user.id, [70.0; 4], user.age_group(), 1000)
            .unwrap();
        svc.delete_user(&user.id).unwrap();
        assert!(svc.list_users().unwrap().is_empty());
        assert!(svc.repo().load_record(&user.id).unwrap().is_none());
    }

    #[test]
    fn delete_unknown_user_is_not_found() {
        let mut svc = test_service();
        assert!(matches!(
            svc.delete_user("usr-00000000"),
            Err(StoreError::NotFound { entity: "user", .. })
        ));
    }
}
