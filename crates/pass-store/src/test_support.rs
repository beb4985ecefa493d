//! Shared test utilities for pass-store unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, TimeZone, Utc};
    use pass_core::entities::{HistorySession, User};
    use pass_core::enums::{AgeGroup, Gender};
    use pass_core::history::build_session;
    use pass_core::norms::NormativeTable;

    use crate::memory::MemoryRepository;
    use crate::service::AssessmentService;

    pub fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 10, 0, 0).unwrap()
    }

    pub fn sample_user(id: &str, age: u32) -> User {
        User {
            id: id.to_string(),
            name: format!("child {id}"),
            age,
            gender: Gender::Male,
            created_at: day(1),
        }
    }

    /// A G3 session on March `d`.
    pub fn sample_session(id: &str, d: u32, raw: [f64; 4]) -> HistorySession {
        build_session(
            id.to_string(),
            day(d),
            raw,
            AgeGroup::UpperPrimary,
            600_000,
            &NormativeTable::builtin(),
        )
        .unwrap()
    }

    /// In-memory service with the built-in normative table.
    pub fn test_service() -> AssessmentService<MemoryRepository> {
        AssessmentService::new(MemoryRepository::new(), NormativeTable::builtin())
    }
}
