//! Cohort snapshot for statistics across all users.

use pass_core::cohort::CohortMember;

use crate::error::StoreError;
use crate::repository::Repository;
use crate::service::AssessmentService;

impl<R: Repository> AssessmentService<R> {
    /// Every user with their stored record, in directory order.
    ///
    /// A record that fails to load is logged and treated as absent so one
    /// damaged file does not block cohort statistics.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the user directory itself cannot be read.
    pub fn cohort(&self) -> Result<Vec<CohortMember>, StoreError> {
        let users = self.repo.list_users()?;
        let mut members = Vec::with_capacity(users.len());
        for user in users {
            let record = match self.repo.load_record(&user.id) {
                Ok(record) => record,
                Err(error) => {
                    tracing::warn!(user_id = %user.id, %error, "skipping unreadable record");
                    None
                }
            };
            members.push(CohortMember { user, record });
        }
        Ok(members)
    }
}
