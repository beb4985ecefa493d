//! Normative reference data.
//!
//! Holds the versioned age breakpoints, the per-(age group, dimension)
//! mean/SD table, the standard-normal z → percentile anchors, and the
//! percentile rating bands. The built-in table can be replaced at startup by a
//! table deserialized from configuration; lookups fall back to the nearest
//! defined age group and flag the result as estimated.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AgeGroup, Dimension, RatingLevel};
use crate::errors::CoreError;

/// Version of the age breakpoint table.
pub const AGE_BREAKPOINTS_VERSION: &str = "2024.1";

/// Inclusive age ranges for each defined group.
pub const AGE_BREAKPOINTS: &[(u32, u32, AgeGroup)] = &[
    (5, 6, AgeGroup::Preschool),
    (7, 9, AgeGroup::LowerPrimary),
    (10, 12, AgeGroup::UpperPrimary),
    (13, 15, AgeGroup::JuniorHigh),
    (16, 17, AgeGroup::SeniorHigh),
];

/// Group used as the starting point of the fallback search for `Unknown`.
pub const UNKNOWN_AGE_ANCHOR: AgeGroup = AgeGroup::UpperPrimary;

/// Standard-normal anchors `(z, percentile)`, ascending in both columns.
pub const Z_TO_PERCENTILE: [(f64, f64); 25] = [
    (-3.0, 0.1),
    (-2.5, 0.6),
    (-2.0, 2.3),
    (-1.8, 3.6),
    (-1.6, 5.5),
    (-1.4, 8.1),
    (-1.2, 11.5),
    (-1.0, 15.9),
    (-0.8, 21.2),
    (-0.6, 27.4),
    (-0.4, 34.5),
    (-0.2, 42.1),
    (0.0, 50.0),
    (0.2, 57.9),
    (0.4, 65.5),
    (0.6, 72.6),
    (0.8, 78.8),
    (1.0, 84.1),
    (1.2, 88.5),
    (1.4, 91.9),
    (1.6, 94.5),
    (1.8, 96.4),
    (2.0, 97.7),
    (2.5, 99.4),
    (3.0, 99.9),
];

/// Display metadata for one percentile rating band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingBand {
    pub level: RatingLevel,
    pub min_percentile: f64,
    pub label: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

/// Rating bands ordered descending by `min_percentile`.
pub static STANDARD_RATINGS: [RatingBand; 7] = [
    RatingBand {
        level: RatingLevel::Exceptional,
        min_percentile: 95.0,
        label: "Exceptional",
        color: "#00B894",
        emoji: "🌟",
        description: "Far above same-age peers",
    },
    RatingBand {
        level: RatingLevel::Excellent,
        min_percentile: 85.0,
        label: "Excellent",
        color: "#00CEC9",
        emoji: "⭐",
        description: "Clearly above same-age peers",
    },
    RatingBand {
        level: RatingLevel::AboveAverage,
        min_percentile: 70.0,
        label: "Above average",
        color: "#6C5CE7",
        emoji: "👍",
        description: "Above the same-age average",
    },
    RatingBand {
        level: RatingLevel::Average,
        min_percentile: 40.0,
        label: "Average",
        color: "#FDCB6E",
        emoji: "💪",
        description: "Within the same-age average",
    },
    RatingBand {
        level: RatingLevel::BelowAverage,
        min_percentile: 20.0,
        label: "Below average",
        color: "#E17055",
        emoji: "📚",
        description: "Slightly below the same-age average",
    },
    RatingBand {
        level: RatingLevel::NeedsImprovement,
        min_percentile: 5.0,
        label: "Needs improvement",
        color: "#FF7675",
        emoji: "❤️",
        description: "Targeted training recommended",
    },
    RatingBand {
        level: RatingLevel::NeedsAttention,
        min_percentile: 0.0,
        label: "Needs attention",
        color: "#D63031",
        emoji: "🔔",
        description: "Professional assessment and guidance recommended",
    },
];

/// Mean, standard deviation, and sample size of a reference population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormativeEntry {
    pub mean: f64,
    pub sd: f64,
    pub sample_size: u32,
}

impl NormativeEntry {
    #[must_use]
    pub const fn new(mean: f64, sd: f64, sample_size: u32) -> Self {
        Self {
            mean,
            sd,
            sample_size,
        }
    }
}

/// Result of a normative lookup, including which group actually supplied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormLookup {
    pub entry: NormativeEntry,
    /// Group whose entry was used.
    pub source: AgeGroup,
    /// `true` when `source` differs from the requested group.
    pub estimated: bool,
}

/// Versioned normative reference table keyed by (age group, dimension).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormativeTable {
    pub version: String,
    #[serde(default)]
    pub groups: BTreeMap<AgeGroup, BTreeMap<Dimension, NormativeEntry>>,
}

impl Default for NormativeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NormativeTable {
    /// Version string of the built-in table.
    pub const BUILTIN_VERSION: &'static str = "2024.1";

    /// The built-in reference table. Values are on the 0–100 dimension-total scale.
    #[must_use]
    pub fn builtin() -> Self {
        let rows: [(AgeGroup, [(f64, f64); 4], u32); 5] = [
            (
                AgeGroup::Preschool,
                [(60.0, 14.0), (55.0, 15.0), (62.0, 13.0), (52.0, 14.0)],
                500,
            ),
            (
                AgeGroup::LowerPrimary,
                [(68.0, 13.0), (65.0, 14.0), (70.0, 12.0), (62.0, 13.0)],
                800,
            ),
            (
                AgeGroup::UpperPrimary,
                [(75.0, 12.0), (72.0, 13.0), (78.0, 11.0), (70.0, 12.0)],
                1000,
            ),
            (
                AgeGroup::JuniorHigh,
                [(80.0, 11.0), (78.0, 12.0), (82.0, 10.0), (76.0, 11.0)],
                600,
            ),
            (
                AgeGroup::SeniorHigh,
                [(84.0, 10.0), (82.0, 11.0), (86.0, 9.0), (80.0, 10.0)],
                400,
            ),
        ];

        let groups = rows
            .into_iter()
            .map(|(group, stats, n)| {
                let dims = Dimension::ALL
                    .into_iter()
                    .zip(stats)
                    .map(|(dim, (mean, sd))| (dim, NormativeEntry::new(mean, sd, n)))
                    .collect();
                (group, dims)
            })
            .collect();

        Self {
            version: Self::BUILTIN_VERSION.to_string(),
            groups,
        }
    }

    /// Check that every entry is usable and every dimension has at least one entry.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for non-finite values, negative SDs,
    /// entries keyed by `Unknown`, or a dimension with no entries at all.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.groups.contains_key(&AgeGroup::Unknown) {
            return Err(CoreError::Validation(
                "normative table must not define the 'unknown' age group".into(),
            ));
        }
        for (group, dims) in &self.groups {
            for (dim, entry) in dims {
                if !entry.mean.is_finite() || !entry.sd.is_finite() || entry.sd < 0.0 {
                    return Err(CoreError::Validation(format!(
                        "invalid normative entry for {group}/{dim}: mean={} sd={}",
                        entry.mean, entry.sd
                    )));
                }
            }
        }
        for dim in Dimension::ALL {
            if !self.groups.values().any(|dims| dims.contains_key(&dim)) {
                return Err(CoreError::Validation(format!(
                    "normative table has no entries for dimension '{dim}'"
                )));
            }
        }
        Ok(())
    }

    /// Exact entry for (group, dimension), without fallback.
    #[must_use]
    pub fn get(&self, group: AgeGroup, dimension: Dimension) -> Option<&NormativeEntry> {
        self.groups.get(&group).and_then(|dims| dims.get(&dimension))
    }

    /// Entry for (group, dimension), falling back along [`fallback_order`].
    ///
    /// Returns `None` only when no group defines the dimension.
    #[must_use]
    pub fn lookup(&self, group: AgeGroup, dimension: Dimension) -> Option<NormLookup> {
        fallback_order(group).into_iter().find_map(|candidate| {
            self.get(candidate, dimension).map(|entry| NormLookup {
                entry: *entry,
                source: candidate,
                estimated: candidate != group,
            })
        })
    }
}

/// Deterministic search order used when a group has no normative entry.
///
/// The requested group comes first, then neighbours at increasing distance,
/// the younger neighbour before the older one. `Unknown` starts from
/// [`UNKNOWN_AGE_ANCHOR`] and is never itself a candidate.
#[must_use]
pub fn fallback_order(group: AgeGroup) -> Vec<AgeGroup> {
    let defined = AgeGroup::DEFINED;
    let (start, mut order) = match group.ordinal() {
        Some(i) => (i, vec![group]),
        None => {
            let anchor = UNKNOWN_AGE_ANCHOR.ordinal().unwrap_or(2);
            (anchor, vec![defined[anchor]])
        }
    };
    for distance in 1..defined.len() {
        if let Some(younger) = start.checked_sub(distance) {
            order.push(defined[younger]);
        }
        if let Some(older) = defined.get(start + distance) {
            order.push(*older);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_complete_and_valid() {
        let table = NormativeTable::builtin();
        table.validate().unwrap();
        for group in AgeGroup::DEFINED {
            for dim in Dimension::ALL {
                assert!(table.get(group, dim).is_some(), "{group}/{dim} missing");
            }
        }
        assert_eq!(
            table.get(AgeGroup::UpperPrimary, Dimension::Simultaneous),
            Some(&NormativeEntry::new(78.0, 11.0, 1000))
        );
    }

    #[test]
    fn z_table_is_strictly_ascending() {
        for pair in Z_TO_PERCENTILE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn ratings_are_descending() {
        for pair in STANDARD_RATINGS.windows(2) {
            assert!(pair[0].min_percentile > pair[1].min_percentile);
        }
        assert_eq!(STANDARD_RATINGS[STANDARD_RATINGS.len() - 1].min_percentile, 0.0);
    }

    #[test]
    fn fallback_order_prefers_younger_neighbour_on_ties() {
        assert_eq!(
            fallback_order(AgeGroup::UpperPrimary),
            vec![
                AgeGroup::UpperPrimary,
                AgeGroup::LowerPrimary,
                AgeGroup::JuniorHigh,
                AgeGroup::Preschool,
                AgeGroup::SeniorHigh,
            ]
        );
        assert_eq!(
            fallback_order(AgeGroup::Preschool),
            vec![
                AgeGroup::Preschool,
                AgeGroup::LowerPrimary,
                AgeGroup::UpperPrimary,
                AgeGroup::JuniorHigh,
                AgeGroup::SeniorHigh,
            ]
        );
    }

    #[test]
    fn unknown_group_is_estimated_from_anchor() {
        let table = NormativeTable::builtin();
        let found = table.lookup(AgeGroup::Unknown, Dimension::Planning).unwrap();
        assert_eq!(found.source, AgeGroup::UpperPrimary);
        assert!(found.estimated);
    }

    #[test]
    fn missing_group_falls_back_to_nearest() {
        let mut table = NormativeTable::builtin();
        table.groups.remove(&AgeGroup::JuniorHigh);

        let found = table.lookup(AgeGroup::JuniorHigh, Dimension::Attention).unwrap();
        assert_eq!(found.source, AgeGroup::UpperPrimary);
        assert!(found.estimated);

        let exact = table.lookup(AgeGroup::SeniorHigh, Dimension::Attention).unwrap();
        assert!(!exact.estimated);
    }

    #[test]
    fn validate_rejects_negative_sd() {
        let mut table = NormativeTable::builtin();
        table
            .groups
            .get_mut(&AgeGroup::Preschool)
            .unwrap()
            .insert(Dimension::Planning, NormativeEntry::new(60.0, -1.0, 10));
        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_dimension() {
        let mut table = NormativeTable::builtin();
        for dims in table.groups.values_mut() {
            dims.remove(&Dimension::Successive);
        }
        assert!(table.validate().is_err());
    }

    #[test]
    fn table_roundtrips_through_json() {
        let table = NormativeTable::builtin();
        let json = serde_json::to_string(&table).unwrap();
        let recovered: NormativeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, table);
    }
}
