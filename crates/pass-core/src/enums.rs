//! Closed enums for dimensions, age groups, ratings, and statistical labels.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Enums that are parsed from user-facing input implement `FromStr` and reject
//! unknown keys with `CoreError::InvalidInput`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::norms::{AGE_BREAKPOINTS, RatingBand, STANDARD_RATINGS};

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// One of the four PASS cognitive dimensions.
///
/// The declaration order is the canonical order used for arrays, tie-breaks,
/// and reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Planning,
    Attention,
    Simultaneous,
    Successive,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Planning,
        Self::Attention,
        Self::Simultaneous,
        Self::Successive,
    ];

    /// Position in canonical order (0..4).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Planning => 0,
            Self::Attention => 1,
            Self::Simultaneous => 2,
            Self::Successive => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Attention => "attention",
            Self::Simultaneous => "simultaneous",
            Self::Successive => "successive",
        }
    }

    /// Human-readable name used in reports and advice text.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Attention => "Attention",
            Self::Simultaneous => "Simultaneous processing",
            Self::Successive => "Successive processing",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown dimension '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// AgeGroup
// ---------------------------------------------------------------------------

/// Age band used to select normative reference values.
///
/// Never stored as independent truth: derive it from an age with
/// [`AgeGroup::from_age`] every time it is needed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Ages 5–6.
    Preschool,
    /// Ages 7–9.
    LowerPrimary,
    /// Ages 10–12.
    UpperPrimary,
    /// Ages 13–15.
    JuniorHigh,
    /// Ages 16–17.
    SeniorHigh,
    /// Outside every breakpoint.
    Unknown,
}

impl AgeGroup {
    /// The five defined groups, youngest first.
    pub const DEFINED: [Self; 5] = [
        Self::Preschool,
        Self::LowerPrimary,
        Self::UpperPrimary,
        Self::JuniorHigh,
        Self::SeniorHigh,
    ];

    /// Classify an age using the versioned breakpoint table.
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        AGE_BREAKPOINTS
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&age))
            .map_or(Self::Unknown, |(_, _, group)| *group)
    }

    /// Position among the defined groups, youngest first. `None` for `Unknown`.
    #[must_use]
    pub const fn ordinal(self) -> Option<usize> {
        match self {
            Self::Preschool => Some(0),
            Self::LowerPrimary => Some(1),
            Self::UpperPrimary => Some(2),
            Self::JuniorHigh => Some(3),
            Self::SeniorHigh => Some(4),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preschool => "preschool",
            Self::LowerPrimary => "lower_primary",
            Self::UpperPrimary => "upper_primary",
            Self::JuniorHigh => "junior_high",
            Self::SeniorHigh => "senior_high",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Preschool => "Preschool (5-6)",
            Self::LowerPrimary => "Lower primary (7-9)",
            Self::UpperPrimary => "Upper primary (10-12)",
            Self::JuniorHigh => "Junior high (13-15)",
            Self::SeniorHigh => "Senior high (16-17)",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DEFINED
            .into_iter()
            .chain([Self::Unknown])
            .find(|g| g.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown age group '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(CoreError::InvalidInput(format!("unknown gender '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// RatingLevel
// ---------------------------------------------------------------------------

/// Percentile-based standardized rating.
///
/// ```text
/// ≥95 exceptional, ≥85 excellent, ≥70 above_average, ≥40 average,
/// ≥20 below_average, ≥5 needs_improvement, else needs_attention
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatingLevel {
    Exceptional,
    Excellent,
    AboveAverage,
    Average,
    BelowAverage,
    NeedsImprovement,
    NeedsAttention,
}

impl RatingLevel {
    /// Highest band whose minimum percentile is at or below `percentile`.
    #[must_use]
    pub fn from_percentile(percentile: f64) -> Self {
        STANDARD_RATINGS
            .iter()
            .find(|band| percentile >= band.min_percentile)
            .map_or(Self::NeedsAttention, |band| band.level)
    }

    /// Display metadata for this level.
    #[must_use]
    pub fn band(self) -> &'static RatingBand {
        STANDARD_RATINGS
            .iter()
            .find(|band| band.level == self)
            .unwrap_or(&STANDARD_RATINGS[STANDARD_RATINGS.len() - 1])
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exceptional => "exceptional",
            Self::Excellent => "excellent",
            Self::AboveAverage => "above_average",
            Self::Average => "average",
            Self::BelowAverage => "below_average",
            Self::NeedsImprovement => "needs_improvement",
            Self::NeedsAttention => "needs_attention",
        }
    }
}

impl fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BalanceLevel
// ---------------------------------------------------------------------------

/// Spread between a user's strongest and weakest percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLevel {
    /// Range ≤ 15.
    Balanced,
    /// Range ≤ 30.
    MildlyImbalanced,
    /// Range > 30.
    Imbalanced,
}

impl BalanceLevel {
    #[must_use]
    pub fn from_range(range: f64) -> Self {
        if range <= 15.0 {
            Self::Balanced
        } else if range <= 30.0 {
            Self::MildlyImbalanced
        } else {
            Self::Imbalanced
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Balanced => "The four cognitive abilities are developing evenly",
            Self::MildlyImbalanced => {
                "Some abilities differ; targeted practice can close the gap"
            }
            Self::Imbalanced => "Abilities differ markedly; focus on the weakest dimension",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::MildlyImbalanced => "mildly_imbalanced",
            Self::Imbalanced => "imbalanced",
        }
    }
}

impl fmt::Display for BalanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OutlierKind / CorrelationStrength
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutlierKind {
    Low,
    High,
}

/// Qualitative strength of a Pearson correlation, by `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl CorrelationStrength {
    #[must_use]
    pub fn from_r(r: f64) -> Self {
        let abs = r.abs();
        if abs >= 0.7 {
            Self::Strong
        } else if abs >= 0.4 {
            Self::Moderate
        } else if abs >= 0.2 {
            Self::Weak
        } else {
            Self::Negligible
        }
    }
}

// ---------------------------------------------------------------------------
// TrendSeries
// ---------------------------------------------------------------------------

/// Which value a trend follows across history sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendSeries {
    /// One dimension's percentile.
    Dimension(Dimension),
    /// The session's average percentile.
    Overall,
}

impl FromStr for TrendSeries {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "overall" {
            return Ok(Self::Overall);
        }
        s.parse().map(Self::Dimension)
    }
}
