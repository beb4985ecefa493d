use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AgeGroup, Gender};

/// An assessed person. The age group is always derived from `age`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Age group for the user's current age.
    #[must_use]
    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age(self.age)
    }
}
