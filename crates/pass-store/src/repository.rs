//! The persistence seam between the assessment service and a storage backend.

use pass_core::entities::{HistorySession, User, UserRecord};

use crate::error::StoreError;

/// Storage for the user directory and per-user records.
///
/// A saved record must load back identical. History is append-only: a save
/// may add sessions after the stored ones but never change or drop them.
pub trait Repository {
    /// All users in insertion order.
    fn list_users(&self) -> Result<Vec<User>, StoreError>;

    fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.list_users()?.into_iter().find(|u| u.id == id))
    }

    /// Insert a user, or replace the one with the same ID in place.
    fn put_user(&mut self, user: &User) -> Result<(), StoreError>;

    /// Remove a user from the directory. Returns `false` if it did not exist.
    fn remove_user(&mut self, id: &str) -> Result<bool, StoreError>;

    fn load_record(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    fn save_record(&mut self, record: &UserRecord) -> Result<(), StoreError>;

    /// Remove a record and its history. Returns `false` if there was none.
    fn remove_record(&mut self, user_id: &str) -> Result<bool, StoreError>;
}

/// Check that `incoming` only extends `stored`.
///
/// # Errors
///
/// Returns `StoreError::AppendOnlyViolation` if `incoming` is shorter than
/// `stored` or differs from it anywhere in the shared prefix.
pub fn check_append_only(
    user_id: &str,
    stored: &[HistorySession],
    incoming: &[HistorySession],
) -> Result<(), StoreError> {
    if incoming.len() < stored.len() {
        return Err(StoreError::AppendOnlyViolation {
            user_id: user_id.to_string(),
            reason: format!(
                "{} stored sessions but only {} in the record",
                stored.len(),
                incoming.len()
            ),
        });
    }
    if let Some((i, _)) = stored
        .iter()
        .zip(incoming)
        .enumerate()
        .find(|(_, (a, b))| a != b)
    {
        return Err(StoreError::AppendOnlyViolation {
            user_id: user_id.to_string(),
            reason: format!("session {} differs from the stored one", stored[i].id),
        });
    }
    Ok(())
}

/// IDs become file names, so only ASCII alphanumerics, `-`, and `_` are allowed.
///
/// # Errors
///
/// Returns `StoreError::InvalidId` for an empty or unsafe ID.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("usr-deadbeef", true)]
    #[case("usr_01", true)]
    #[case("", false)]
    #[case("../etc", false)]
    #[case("usr/1", false)]
    #[case("usr 1", false)]
    fn id_validation(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_id(id).is_ok(), ok);
    }
}
