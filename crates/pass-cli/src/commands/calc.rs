//! Stateless calculators that never open the store.

use chrono::Utc;
use pass_core::advice::dimension_level;
use pass_core::enums::AgeGroup;
use pass_core::norms::NormativeTable;
use pass_core::scoring::{TrialFeed, score_sub_test};
use pass_core::standard::standardize as standardize_scores;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ScoreArgs, StandardizeArgs};
use crate::commands::shared::parse::parse_scores;
use crate::output::output;

/// Handle `pass score`.
pub fn score(args: &ScoreArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let group = AgeGroup::from_age(args.age);
    if group == AgeGroup::Unknown {
        tracing::warn!(age = args.age, "age outside all groups; using neutral scoring factors");
    }
    let feed = TrialFeed {
        correct_count: args.correct,
        total_count: args.total,
        reaction_times_ms: args.rt.clone(),
    };
    let result = score_sub_test(&feed, group, args.dimension, 0, Utc::now())?;

    output(
        &json!({
            "dimension": args.dimension,
            "age_group": group,
            "raw_score": result.raw_score,
            "correct_rate": feed.correct_rate(),
            "avg_reaction_time_ms": result.avg_reaction_time_ms,
            "level": dimension_level(result.raw_score),
        }),
        flags.format,
    )
}

/// Handle `pass standardize`.
pub fn standardize(
    args: &StandardizeArgs,
    norms: &NormativeTable,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let raw_scores = parse_scores(&args.scores)?;
    let group = AgeGroup::from_age(args.age);
    let profile = standardize_scores(&raw_scores, group, norms)?;
    if profile.estimated() {
        tracing::warn!(group = %group, "standardized against estimated norms");
    }
    let balance = profile.balance();
    output(
        &json!({
            "profile": profile,
            "balance": balance,
            "balance_summary": balance.level.description(),
        }),
        flags.format,
    )
}

/// Handle `pass norms`.
pub fn norms(table: &NormativeTable, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(table, flags.format)
}
