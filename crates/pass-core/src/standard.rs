//! Standardization: raw dimension totals → Z, T, percentile, rating.
//!
//! Each dimension is standardized against the normative entry for the user's
//! age group. When the table has no entry for that group, the nearest defined
//! group is used (see [`crate::norms::fallback_order`]) and the score is marked
//! `estimated`. A zero standard deviation yields `z = 0` and marks the score
//! `degenerate` instead of dividing by zero.

use serde::Serialize;

use crate::entities::{BalanceReport, OverallScore, StandardizedSet};
use crate::enums::{AgeGroup, BalanceLevel, Dimension, RatingLevel};
use crate::errors::{CoreError, ensure_finite};
use crate::norms::{NormativeEntry, NormativeTable, Z_TO_PERCENTILE};
use crate::{round1, round2};

/// Lowest and highest reportable T-score.
pub const T_SCORE_MIN: f64 = 20.0;
pub const T_SCORE_MAX: f64 = 80.0;

/// Z-score against a normative entry. Returns `(z, degenerate)`.
#[must_use]
pub fn z_score(raw: f64, entry: &NormativeEntry) -> (f64, bool) {
    if entry.sd == 0.0 {
        return (0.0, true);
    }
    ((raw - entry.mean) / entry.sd, false)
}

/// `clamp(round1(50 + 10z), 20, 80)`.
#[must_use]
pub fn t_score(z: f64) -> f64 {
    round1(10.0f64.mul_add(z, 50.0)).clamp(T_SCORE_MIN, T_SCORE_MAX)
}

/// Percentile for `z` by linear interpolation between the standard-normal anchors.
///
/// Values outside the table clamp to its extreme percentiles (0.1 and 99.9).
/// The result is rounded to one decimal, which keeps it non-decreasing in `z`.
#[must_use]
pub fn z_to_percentile(z: f64) -> f64 {
    let (first_z, first_p) = Z_TO_PERCENTILE[0];
    let (last_z, last_p) = Z_TO_PERCENTILE[Z_TO_PERCENTILE.len() - 1];
    if z <= first_z {
        return first_p;
    }
    if z >= last_z {
        return last_p;
    }

    Z_TO_PERCENTILE
        .windows(2)
        .find(|pair| z >= pair[0].0 && z < pair[1].0)
        .map_or(50.0, |pair| {
            let (z0, p0) = pair[0];
            let (z1, p1) = pair[1];
            let ratio = (z - z0) / (z1 - z0);
            round1(ratio.mul_add(p1 - p0, p0))
        })
}

/// One dimension's standardized result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardizedScore {
    pub dimension: Dimension,
    pub raw: f64,
    /// Rounded to two decimals.
    pub z: f64,
    pub t: f64,
    pub percentile: f64,
    pub rating: RatingLevel,
    /// Age group whose normative entry was used.
    pub norm_group: AgeGroup,
    /// Normative entry came from a fallback group.
    pub estimated: bool,
    /// Normative SD was zero; `z` was forced to 0.
    pub degenerate: bool,
}

/// Standardized scores for all four dimensions plus the overall summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizedProfile {
    pub age_group: AgeGroup,
    pub norms_version: String,
    pub scores: [StandardizedScore; 4],
    pub overall: OverallScore,
}

impl StandardizedProfile {
    #[must_use]
    pub const fn score(&self, dimension: Dimension) -> &StandardizedScore {
        &self.scores[dimension.index()]
    }

    #[must_use]
    pub fn percentiles(&self) -> [f64; 4] {
        self.scores.map(|s| s.percentile)
    }

    /// Whether any dimension used a fallback normative entry.
    #[must_use]
    pub fn estimated(&self) -> bool {
        self.scores.iter().any(|s| s.estimated)
    }

    #[must_use]
    pub fn balance(&self) -> BalanceReport {
        analyze_balance(&self.percentiles())
    }

    /// Compact form stored in history sessions.
    #[must_use]
    pub fn to_set(&self) -> StandardizedSet {
        StandardizedSet {
            z: self.scores.map(|s| s.z),
            t: self.scores.map(|s| s.t),
            percentile: self.percentiles(),
        }
    }
}

/// Standardize four raw dimension totals (canonical order) for an age group.
///
/// Pure: identical inputs always produce identical output.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` for a non-finite or negative raw score,
/// and `CoreError::Validation` if the table has no entry for a dimension in
/// any age group.
pub fn standardize(
    raw_scores: &[f64; 4],
    group: AgeGroup,
    norms: &NormativeTable,
) -> Result<StandardizedProfile, CoreError> {
    let mut scores = Vec::with_capacity(4);
    for dimension in Dimension::ALL {
        let raw = ensure_finite("raw score", raw_scores[dimension.index()])?;
        if raw < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "raw score for {dimension} must not be negative, got {raw}"
            )));
        }
        let found = norms.lookup(group, dimension).ok_or_else(|| {
            CoreError::Validation(format!(
                "normative table {} has no entry for {dimension}",
                norms.version
            ))
        })?;

        let (z, degenerate) = z_score(raw, &found.entry);
        let percentile = z_to_percentile(z);
        scores.push(StandardizedScore {
            dimension,
            raw,
            z: round2(z),
            t: t_score(z),
            percentile,
            rating: RatingLevel::from_percentile(percentile),
            norm_group: found.source,
            estimated: found.estimated,
            degenerate,
        });
    }

    let scores: [StandardizedScore; 4] = scores
        .try_into()
        .map_err(|_| CoreError::Other(anyhow::anyhow!("expected four standardized scores")))?;

    let avg_percentile = scores.iter().map(|s| s.percentile).sum::<f64>() / 4.0;
    let overall = OverallScore {
        avg_percentile: round1(avg_percentile),
        rating: RatingLevel::from_percentile(avg_percentile),
    };

    Ok(StandardizedProfile {
        age_group: group,
        norms_version: norms.version.clone(),
        scores,
        overall,
    })
}

/// Classify the spread of four percentiles (canonical order).
///
/// Ties for strongest or weakest go to the first dimension in canonical order.
#[must_use]
pub fn analyze_balance(percentiles: &[f64; 4]) -> BalanceReport {
    let mut strongest = Dimension::Planning;
    let mut weakest = Dimension::Planning;
    for dimension in Dimension::ALL {
        let p = percentiles[dimension.index()];
        if p > percentiles[strongest.index()] {
            strongest = dimension;
        }
        if p < percentiles[weakest.index()] {
            weakest = dimension;
        }
    }

    let range = percentiles[strongest.index()] - percentiles[weakest.index()];
    BalanceReport {
        range,
        level: BalanceLevel::from_range(range),
        strongest,
        weakest,
        percentiles: *percentiles,
    }
}
