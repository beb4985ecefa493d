use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AgeGroup, BalanceLevel, Dimension, RatingLevel};

/// Z, T, and percentile per dimension, in canonical dimension order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StandardizedSet {
    pub z: [f64; 4],
    pub t: [f64; 4],
    pub percentile: [f64; 4],
}

/// Cross-dimension summary of a standardized profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OverallScore {
    /// Mean of the four percentiles, one decimal.
    pub avg_percentile: f64,
    pub rating: RatingLevel,
}

/// Spread between the strongest and weakest dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BalanceReport {
    /// `max(percentile) - min(percentile)`.
    pub range: f64,
    pub level: BalanceLevel,
    pub strongest: Dimension,
    pub weakest: Dimension,
    pub percentiles: [f64; 4],
}

/// One completed assessment in a user's history. Never modified once appended.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistorySession {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub age_group: AgeGroup,
    /// Dimension totals on the 0–100 scale, canonical order.
    pub raw_scores: [f64; 4],
    pub standardized: StandardizedSet,
    pub overall: OverallScore,
    pub balance: BalanceReport,
    /// Set when any dimension was scored against a fallback age group.
    #[serde(default)]
    pub estimated: bool,
}

impl HistorySession {
    /// Sum of the four raw dimension totals.
    #[must_use]
    pub fn raw_total(&self) -> f64 {
        self.raw_scores.iter().sum()
    }

    #[must_use]
    pub const fn percentile(&self, dimension: Dimension) -> f64 {
        self.standardized.percentile[dimension.index()]
    }
}

/// Summary derived from a user's full history. Recomputed on every append.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UserStatistics {
    pub total_tests: u32,
    /// Mean raw total, rounded to an integer.
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub first_test_date: DateTime<Utc>,
    pub last_test_date: DateTime<Utc>,
    /// `(last - first) / first` over raw totals, two decimals; 0 when `first` is 0.
    pub improvement_rate: f64,
}
