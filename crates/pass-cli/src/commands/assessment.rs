use chrono::Utc;
use pass_core::enums::Dimension;
use pass_core::scoring::TrialFeed;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{RecordArgs, SubmitArgs, UserArg};
use crate::commands::shared::parse::parse_scores;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pass submit`.
pub fn submit(args: &SubmitArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let feed = TrialFeed {
        correct_count: args.correct,
        total_count: args.total,
        reaction_times_ms: args.rt.clone(),
    };
    let result = ctx
        .service
        .submit_sub_test(&args.user_id, args.dimension, args.sub_test, &feed)?;
    let record = ctx.service.progress(&args.user_id)?;

    output(
        &json!({
            "result": result,
            "dimension": args.dimension,
            "dimension_total": record.result(args.dimension).total_score,
            "progress": record.progress(args.dimension),
            "completed_dimensions": record.completed_count(),
        }),
        flags.format,
    )
}

/// Handle `pass progress`.
pub fn progress(args: &UserArg, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let record = ctx.service.progress(&args.user_id)?;
    let dimensions: Vec<_> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            json!({
                "dimension": dimension,
                "progress": record.progress(dimension),
                "result": record.result(dimension),
            })
        })
        .collect();

    output(
        &json!({
            "user_id": record.user_id,
            "started_at": record.started_at,
            "completed_dimensions": record.completed_count(),
            "raw_scores": record.overall_raw_scores(),
            "dimensions": dimensions,
        }),
        flags.format,
    )
}

/// Handle `pass reset`.
pub fn reset(args: &UserArg, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.reset_progress(&args.user_id)?;
    output(&json!({ "reset": args.user_id }), flags.format)
}

/// Handle `pass finish`.
pub fn finish(args: &UserArg, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.service.finish_assessment(&args.user_id, Utc::now())?;
    output(&json!({ "session": session }), flags.format)
}

/// Handle `pass record`.
pub fn record(args: &RecordArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw_scores = parse_scores(&args.scores)?;
    let age_group = match args.age_group {
        Some(group) => group,
        None => ctx.service.get_user(&args.user_id)?.age_group(),
    };
    let session = ctx
        .service
        .record_session(&args.user_id, raw_scores, age_group, args.duration_ms)?;
    output(&json!({ "session": session }), flags.format)
}

/// Handle `pass profile`.
pub fn profile(args: &UserArg, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let profile = ctx.service.current_profile(&args.user_id)?;
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

/// Handle `pass report`.
pub fn report(args: &UserArg, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.report(&args.user_id)?;
    output(&report, flags.format)
}
