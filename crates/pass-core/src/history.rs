//! Derivations over a user's session history.
//!
//! History is an append-only, chronologically ordered slice of
//! [`HistorySession`]s. Everything here reads that slice in insertion order and
//! never reorders it.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::entities::{HistorySession, UserStatistics};
use crate::enums::{AgeGroup, Dimension, TrendSeries};
use crate::errors::CoreError;
use crate::norms::NormativeTable;
use crate::round2;
use crate::standard::standardize;

/// Standardize raw dimension totals and package them as a history session.
///
/// # Errors
///
/// Propagates `CoreError` from [`standardize`].
pub fn build_session(
    id: String,
    timestamp: DateTime<Utc>,
    raw_scores: [f64; 4],
    group: AgeGroup,
    duration_ms: u64,
    norms: &NormativeTable,
) -> Result<HistorySession, CoreError> {
    let profile = standardize(&raw_scores, group, norms)?;
    Ok(HistorySession {
        id,
        timestamp,
        duration_ms,
        age_group: group,
        raw_scores,
        standardized: profile.to_set(),
        overall: profile.overall,
        balance: profile.balance(),
        estimated: profile.estimated(),
    })
}

/// Statistics summary over the whole history. `None` for an empty history.
#[must_use]
pub fn summarize(history: &[HistorySession]) -> Option<UserStatistics> {
    let first = history.first()?;
    let last = history.last()?;
    let totals: Vec<f64> = history.iter().map(HistorySession::raw_total).collect();

    #[allow(clippy::cast_precision_loss)]
    let average = totals.iter().sum::<f64>() / totals.len() as f64;
    let best = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst = totals.iter().copied().fold(f64::INFINITY, f64::min);

    let first_total = first.raw_total();
    let improvement_rate = if first_total > 0.0 {
        round2((last.raw_total() - first_total) / first_total)
    } else {
        0.0
    };

    Some(UserStatistics {
        total_tests: u32::try_from(history.len()).unwrap_or(u32::MAX),
        average_score: average.round(),
        best_score: best,
        worst_score: worst,
        first_test_date: first.timestamp,
        last_test_date: last.timestamp,
        improvement_rate,
    })
}

/// The last `limit` sessions, or all of them when `limit` is `None`.
#[must_use]
pub fn recent(history: &[HistorySession], limit: Option<usize>) -> &[HistorySession] {
    match limit {
        Some(n) if n < history.len() => &history[history.len() - n..],
        _ => history,
    }
}

/// One point of a trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `month/day` of the session.
    pub label: String,
    pub value: f64,
}

/// A restartable view of one series across the history.
///
/// Iterating twice yields the same points in the same order.
#[derive(Debug, Clone, Copy)]
pub struct Trend<'a> {
    sessions: &'a [HistorySession],
    series: TrendSeries,
}

impl<'a> Trend<'a> {
    #[must_use]
    pub fn iter(&self) -> TrendIter<'a> {
        TrendIter {
            inner: self.sessions.iter(),
            series: self.series,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<'a> IntoIterator for &Trend<'a> {
    type Item = TrendPoint;
    type IntoIter = TrendIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`TrendPoint`]s in insertion order.
#[derive(Debug, Clone)]
pub struct TrendIter<'a> {
    inner: std::slice::Iter<'a, HistorySession>,
    series: TrendSeries,
}

impl Iterator for TrendIter<'_> {
    type Item = TrendPoint;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|session| trend_point(session, self.series))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for TrendIter<'_> {}

fn trend_point(session: &HistorySession, series: TrendSeries) -> TrendPoint {
    let value = match series {
        TrendSeries::Dimension(dimension) => session.percentile(dimension),
        TrendSeries::Overall => session.overall.avg_percentile,
    };
    TrendPoint {
        label: format!("{}/{}", session.timestamp.month(), session.timestamp.day()),
        value,
    }
}

/// Trend of one dimension's percentile, or the overall average percentile.
#[must_use]
pub const fn trend(history: &[HistorySession], series: TrendSeries) -> Trend<'_> {
    Trend {
        sessions: history,
        series,
    }
}

/// Percentile change of one dimension between the first and last session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Improvement {
    pub first: f64,
    pub last: f64,
    pub change: f64,
    /// `round(change / first * 100)`, or 0 when `first` is 0.
    pub percentage: f64,
    pub improved: bool,
    pub test_count: usize,
}

/// First-to-last percentile change. `None` with fewer than two sessions.
#[must_use]
pub fn improvement(history: &[HistorySession], dimension: Dimension) -> Option<Improvement> {
    if history.len() < 2 {
        return None;
    }
    let first = history.first()?.percentile(dimension);
    let last = history.last()?.percentile(dimension);
    let change = last - first;
    let percentage = if first > 0.0 {
        (change / first * 100.0).round()
    } else {
        0.0
    };
    Some(Improvement {
        first,
        last,
        change,
        percentage,
        improved: change > 0.0,
        test_count: history.len(),
    })
}

/// Per-dimension deltas between two sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionDelta {
    pub dimension: Dimension,
    pub raw_change: f64,
    pub percentile_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionComparison {
    pub earlier: HistorySession,
    pub later: HistorySession,
    pub deltas: [DimensionDelta; 4],
}

/// Compare two sessions by ID (`second - first`). `None` if either is missing.
#[must_use]
pub fn compare_sessions(
    history: &[HistorySession],
    first_id: &str,
    second_id: &str,
) -> Option<SessionComparison> {
    let a = history.iter().find(|s| s.id == first_id)?;
    let b = history.iter().find(|s| s.id == second_id)?;
    let deltas = Dimension::ALL.map(|dimension| {
        let i = dimension.index();
        DimensionDelta {
            dimension,
            raw_change: b.raw_scores[i] - a.raw_scores[i],
            percentile_change: b.standardized.percentile[i] - a.standardized.percentile[i],
        }
    });
    Some(SessionComparison {
        earlier: a.clone(),
        later: b.clone(),
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRecord;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, 10, 0, 0).unwrap()
    }

    fn session(id: &str, day: u32, raw: [f64; 4]) -> HistorySession {
        build_session(
            id.to_string(),
            at(day),
            raw,
            AgeGroup::UpperPrimary,
            600_000,
            &NormativeTable::builtin(),
        )
        .unwrap()
    }

    fn sample_history() -> Vec<HistorySession> {
        vec![
            session("tst-00000001", 1, [75.0, 72.0, 78.0, 70.0]),
            session("tst-00000002", 8, [87.0, 85.0, 78.0, 70.0]),
            session("tst-00000003", 15, [63.0, 85.0, 89.0, 82.0]),
        ]
    }

    #[test]
    fn build_session_carries_standardized_scores() {
        let s = session("tst-00000001", 1, [75.0, 85.0, 78.0, 70.0]);
        assert_eq!(s.standardized.percentile, [50.0, 84.1, 50.0, 50.0]);
        assert_eq!(s.standardized.t, [50.0, 60.0, 50.0, 50.0]);
        assert_eq!(s.balance.strongest, Dimension::Attention);
        assert!(!s.estimated);
    }

    #[test]
    fn summary_over_history() {
        let stats = summarize(&sample_history()).unwrap();
        assert_eq!(stats.total_tests, 3);
        assert_eq!(stats.best_score, 320.0);
        assert_eq!(stats.worst_score, 295.0);
        assert_eq!(stats.average_score, 311.0);
        // (319 - 295) / 295 = 0.0813...
        assert_eq!(stats.improvement_rate, 0.08);
        assert_eq!(stats.first_test_date, at(1));
        assert_eq!(stats.last_test_date, at(15));
    }

    #[test]
    fn summary_of_empty_history_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summary_with_zero_first_total_has_zero_rate() {
        let history = vec![
            session("tst-00000001", 1, [0.0; 4]),
            session("tst-00000002", 2, [50.0; 4]),
        ];
        assert_eq!(summarize(&history).unwrap().improvement_rate, 0.0);
    }

    #[test]
    fn trend_follows_insertion_order_and_restarts() {
        let history = sample_history();
        let t = trend(&history, TrendSeries::Dimension(Dimension::Planning));

        let first_pass: Vec<TrendPoint> = t.iter().collect();
        let second_pass: Vec<TrendPoint> = (&t).into_iter().collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(t.len(), 3);

        let labels: Vec<&str> = first_pass.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["4/1", "4/8", "4/15"]);
        assert_eq!(first_pass[0].value, 50.0);
        assert_eq!(first_pass[1].value, 84.1);
    }

    #[test]
    fn overall_trend_uses_average_percentile() {
        let history = sample_history();
        let values: Vec<f64> = trend(&history, TrendSeries::Overall)
            .iter()
            .map(|p| p.value)
            .collect();
        let expected: Vec<f64> = history.iter().map(|s| s.overall.avg_percentile).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn empty_trend() {
        assert!(trend(&[], TrendSeries::Overall).is_empty());
    }

    #[test]
    fn improvement_needs_two_sessions() {
        let history = sample_history();
        assert!(improvement(&history[..1], Dimension::Attention).is_none());

        let imp = improvement(&history, Dimension::Attention).unwrap();
        assert_eq!(imp.first, 50.0);
        assert_eq!(imp.last, 84.1);
        assert!(imp.improved);
        assert_eq!(imp.test_count, 3);
        // 34.1 / 50 = 68.2%
        assert_eq!(imp.percentage, 68.0);
    }

    #[test]
    fn recent_limits_from_the_end() {
        let history = sample_history();
        assert_eq!(recent(&history, Some(2))[0].id, "tst-00000002");
        assert_eq!(recent(&history, Some(10)).len(), 3);
        assert_eq!(recent(&history, None).len(), 3);
    }

    #[test]
    fn compare_two_sessions() {
        let history = sample_history();
        let cmp = compare_sessions(&history, "tst-00000001", "tst-00000002").unwrap();
        assert_eq!(cmp.deltas[0].raw_change, 12.0);
        assert_eq!(cmp.deltas[1].percentile_change, 84.1 - 50.0);
        assert!(compare_sessions(&history, "tst-00000001", "tst-ffffffff").is_none());
    }

    #[test]
    fn push_session_never_goes_back_in_time() {
        let mut record = UserRecord::new("usr-00000001");
        assert!(!record.push_session(session("tst-00000001", 10, [70.0; 4])));

        let mut late = session("tst-00000002", 3, [80.0; 4]);
        late.timestamp = at(10) - Duration::hours(1);
        assert!(record.push_session(late));

        assert_eq!(record.history[1].timestamp, at(10));
        assert_eq!(record.statistics.as_ref().unwrap().total_tests, 2);
    }
}
