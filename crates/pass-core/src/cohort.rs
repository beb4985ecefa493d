//! Cohort statistics over many users' stored records.
//!
//! Inclusion filters differ by operation and are part of the contract:
//! - descriptive stats and group means count a dimension only when its total
//!   is positive, so users who never attempted a dimension drop out of that
//!   dimension's denominator;
//! - correlation only uses members with all four dimensions positive;
//! - outlier detection uses positive scores per dimension independently.
//!
//! Operations that need a minimum sample return an explicit "not computable"
//! variant instead of a number.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entities::{User, UserRecord};
use crate::enums::{AgeGroup, CorrelationStrength, Dimension, Gender, OutlierKind};
use crate::{round1, round2};

/// Minimum fully-scored members for a correlation.
pub const MIN_CORRELATION_SAMPLE: usize = 3;

/// Minimum positive scores in a dimension for outlier detection.
pub const MIN_OUTLIER_SAMPLE: usize = 4;

/// Tukey fence multiplier.
const IQR_MULTIPLIER: f64 = 1.5;

/// A user and their stored record, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortMember {
    pub user: User,
    pub record: Option<UserRecord>,
}

impl CohortMember {
    /// Dimension total, 0 when there is no record.
    #[must_use]
    pub fn score(&self, dimension: Dimension) -> f64 {
        self.record
            .as_ref()
            .map_or(0.0, |r| r.result(dimension).total_score)
    }

    fn positive_score(&self, dimension: Dimension) -> Option<f64> {
        Some(self.score(dimension)).filter(|s| *s > 0.0)
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionStats {
    pub mean: f64,
    /// Population standard deviation (n divisor).
    pub sd: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Members that have a record at all.
    pub count: usize,
    /// `None` for a dimension with no positive scores.
    pub dimensions: BTreeMap<Dimension, Option<DimensionStats>>,
    /// Statistics of positive grand totals across the four dimensions.
    pub total: Option<DimensionStats>,
}

fn mean(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Summary statistics of a non-empty sample, rounded to one decimal.
fn describe(values: &[f64]) -> Option<DimensionStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / {
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        n
    };
    let s = sorted(values);
    let median = if n % 2 == 0 {
        f64::midpoint(s[n / 2 - 1], s[n / 2])
    } else {
        s[n / 2]
    };
    Some(DimensionStats {
        mean: round1(m),
        sd: round1(variance.sqrt()),
        median: round1(median),
        min: s[0],
        max: s[n - 1],
        count: n,
    })
}

/// Per-dimension descriptive statistics over positive scores.
#[must_use]
pub fn descriptive_stats(members: &[CohortMember]) -> DescriptiveStats {
    let with_records: Vec<&CohortMember> = members.iter().filter(|m| m.record.is_some()).collect();

    let dimensions = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let scores: Vec<f64> = with_records
                .iter()
                .filter_map(|m| m.positive_score(dimension))
                .collect();
            (dimension, describe(&scores))
        })
        .collect();

    let totals: Vec<f64> = with_records
        .iter()
        .map(|m| Dimension::ALL.iter().map(|d| m.score(*d)).sum::<f64>())
        .filter(|t| *t > 0.0)
        .collect();

    DescriptiveStats {
        count: with_records.len(),
        dimensions,
        total: describe(&totals),
    }
}

// ---------------------------------------------------------------------------
// Group comparisons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Members in the group, with or without scores.
    pub count: usize,
    /// Mean of positive scores per dimension; `None` when the group has none.
    pub means: BTreeMap<Dimension, Option<f64>>,
}

fn summarize_group(members: &[&CohortMember]) -> GroupSummary {
    let means = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let scores: Vec<f64> = members
                .iter()
                .filter_map(|m| m.positive_score(dimension))
                .collect();
            let value = (!scores.is_empty()).then(|| round1(mean(&scores)));
            (dimension, value)
        })
        .collect();
    GroupSummary {
        count: members.len(),
        means,
    }
}

/// Dimension means per gender. Both genders are always present.
#[must_use]
pub fn compare_by_gender(members: &[CohortMember]) -> BTreeMap<Gender, GroupSummary> {
    [Gender::Male, Gender::Female]
        .into_iter()
        .map(|gender| {
            let group: Vec<&CohortMember> =
                members.iter().filter(|m| m.user.gender == gender).collect();
            (gender, summarize_group(&group))
        })
        .collect()
}

/// Dimension means per age group, recomputed from each user's age.
///
/// Only groups with at least one member appear.
#[must_use]
pub fn compare_by_age_group(members: &[CohortMember]) -> BTreeMap<AgeGroup, GroupSummary> {
    let mut groups: BTreeMap<AgeGroup, Vec<&CohortMember>> = BTreeMap::new();
    for member in members {
        groups.entry(member.user.age_group()).or_default().push(member);
    }
    groups
        .into_iter()
        .map(|(group, list)| (group, summarize_group(&list)))
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionCorrelation {
    pub first: Dimension,
    pub second: Dimension,
    /// Pearson r, two decimals. `None` when either dimension has zero variance.
    pub r: Option<f64>,
    pub strength: Option<CorrelationStrength>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationReport {
    InsufficientData { qualifying: usize, required: usize },
    Computed {
        sample_size: usize,
        pairs: Vec<DimensionCorrelation>,
    },
}

/// Pearson correlation coefficient. `None` if either series is constant.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    (denom != 0.0).then(|| sxy / denom)
}

/// Pearson r for each of the six dimension pairs.
///
/// Only members with all four dimensions positive take part; fewer than
/// [`MIN_CORRELATION_SAMPLE`] yields [`CorrelationReport::InsufficientData`].
#[must_use]
pub fn correlate(members: &[CohortMember]) -> CorrelationReport {
    let rows: Vec<[f64; 4]> = members
        .iter()
        .filter(|m| m.record.is_some())
        .map(|m| Dimension::ALL.map(|d| m.score(d)))
        .filter(|row| row.iter().all(|s| *s > 0.0))
        .collect();

    if rows.len() < MIN_CORRELATION_SAMPLE {
        return CorrelationReport::InsufficientData {
            qualifying: rows.len(),
            required: MIN_CORRELATION_SAMPLE,
        };
    }

    let column = |d: Dimension| -> Vec<f64> { rows.iter().map(|row| row[d.index()]).collect() };

    let mut pairs = Vec::with_capacity(6);
    for (i, first) in Dimension::ALL.into_iter().enumerate() {
        for second in Dimension::ALL.into_iter().skip(i + 1) {
            let r = pearson(&column(first), &column(second));
            pairs.push(DimensionCorrelation {
                first,
                second,
                r: r.map(round2),
                strength: r.map(CorrelationStrength::from_r),
            });
        }
    }

    CorrelationReport::Computed {
        sample_size: rows.len(),
        pairs,
    }
}

// ---------------------------------------------------------------------------
// Outliers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub user_id: String,
    pub name: String,
    pub dimension: Dimension,
    pub score: f64,
    pub kind: OutlierKind,
    /// The fence that was crossed, rounded.
    pub bound: f64,
}

/// Tukey fences computed for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierFence {
    pub dimension: Dimension,
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// A dimension with too few positive scores to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedDimension {
    pub dimension: Dimension,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlierReport {
    pub outliers: Vec<Outlier>,
    pub fences: Vec<OutlierFence>,
    pub skipped: Vec<SkippedDimension>,
}

/// Quartile positions `floor(n * 0.25)` and `floor(n * 0.75)` in a sorted sample.
fn quartiles(sorted_scores: &[f64]) -> (f64, f64) {
    let n = sorted_scores.len();
    (sorted_scores[n / 4], sorted_scores[n * 3 / 4])
}

/// Tukey IQR outliers, each dimension checked independently.
#[must_use]
pub fn detect_outliers(members: &[CohortMember]) -> OutlierReport {
    let mut report = OutlierReport::default();

    for dimension in Dimension::ALL {
        let scored: Vec<(&CohortMember, f64)> = members
            .iter()
            .filter_map(|m| m.positive_score(dimension).map(|s| (m, s)))
            .collect();

        if scored.len() < MIN_OUTLIER_SAMPLE {
            report.skipped.push(SkippedDimension {
                dimension,
                count: scored.len(),
            });
            continue;
        }

        let values: Vec<f64> = scored.iter().map(|(_, s)| *s).collect();
        let (q1, q3) = quartiles(&sorted(&values));
        let iqr = q3 - q1;
        let lower = IQR_MULTIPLIER.mul_add(-iqr, q1);
        let upper = IQR_MULTIPLIER.mul_add(iqr, q3);

        report.fences.push(OutlierFence {
            dimension,
            q1,
            q3,
            lower,
            upper,
            count: scored.len(),
        });

        for (member, score) in scored {
            let flagged = if score < lower {
                Some((OutlierKind::Low, lower))
            } else if score > upper {
                Some((OutlierKind::High, upper))
            } else {
                None
            };
            if let Some((kind, bound)) = flagged {
                report.outliers.push(Outlier {
                    user_id: member.user.id.clone(),
                    name: member.user.name.clone(),
                    dimension,
                    score,
                    kind,
                    bound: bound.round(),
                });
            }
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionStats {
    pub total: usize,
    /// All four dimensions completed.
    pub completed: usize,
    /// One to three dimensions completed.
    pub in_progress: usize,
    pub not_started: usize,
    /// `completed / total` as a rounded percentage.
    pub rate: f64,
}

/// Assessment completion across the cohort.
#[must_use]
pub fn completion_stats(members: &[CohortMember]) -> CompletionStats {
    let mut stats = CompletionStats {
        total: members.len(),
        completed: 0,
        in_progress: 0,
        not_started: 0,
        rate: 0.0,
    };
    for member in members {
        match member.record.as_ref().map_or(0, UserRecord::completed_count) {
            4 => stats.completed += 1,
            0 => stats.not_started += 1,
            _ => stats.in_progress += 1,
        }
    }
    if stats.total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = stats.completed as f64 / stats.total as f64 * 100.0;
        stats.rate = rate.round();
    }
    stats
}
