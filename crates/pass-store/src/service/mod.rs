//! Service layer orchestrating record mutations over a [`Repository`].
//!
//! `AssessmentService` owns a repository and the normative table in effect.
//! Every mutating operation takes `&mut self`, so a single owner serializes
//! writes to its store. Operations are grouped by concern in the submodules,
//! each an `impl` block on the service.

mod assessment;
mod cohort;
mod history;
mod report;
mod users;

pub use report::{AssessmentReport, ReportSource};

use pass_core::entities::{User, UserRecord};
use pass_core::norms::NormativeTable;

use crate::error::StoreError;
use crate::repository::Repository;

pub struct AssessmentService<R: Repository> {
    repo: R,
    norms: NormativeTable,
}

impl<R: Repository> AssessmentService<R> {
    #[must_use]
    pub const fn new(repo: R, norms: NormativeTable) -> Self {
        Self { repo, norms }
    }

    #[must_use]
    pub const fn repo(&self) -> &R {
        &self.repo
    }

    /// The normative table used for standardization.
    #[must_use]
    pub const fn norms(&self) -> &NormativeTable {
        &self.norms
    }

    fn require_user(&self, user_id: &str) -> Result<User, StoreError> {
        self.repo
            .get_user(user_id)?
            .ok_or_else(|| StoreError::user_not_found(user_id))
    }

    /// The stored record, or a fresh one if the user has none yet.
    fn record_or_new(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        Ok(self
            .repo
            .load_record(user_id)?
            .unwrap_or_else(|| UserRecord::new(user_id)))
    }
}
