//! # pass-core
//!
//! Scoring and normative-statistics engine for PASS cognitive assessments
//! (Planning, Attention, Simultaneous, Successive).
//!
//! This crate is pure and synchronous. It provides:
//! - Entity structs for users, sub-test results, progress, and history sessions
//! - Closed enums for dimensions, age groups, ratings, and balance levels
//! - The built-in normative reference table and the z → percentile table
//! - Raw sub-test scoring from accuracy and reaction time
//! - Standardization (Z, T, percentile, rating) and balance analysis
//! - History derivations: statistics summary, trends, improvement, comparison
//! - Cohort statistics: descriptive stats, group means, correlation, outliers
//! - Advice and score-level lookups
//!
//! Persistence lives in `pass-store`; this crate never touches I/O.

pub mod advice;
pub mod cohort;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod history;
pub mod ids;
pub mod norms;
pub mod scoring;
pub mod standard;

/// Round to one decimal place, the precision used for displayed scores.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
