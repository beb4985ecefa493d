use pass_core::enums::Dimension;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{CompareArgs, ImprovementArgs, TrendArgs, UserArg};
use crate::context::AppContext;
use crate::output::output;

/// Handle `pass history`.
pub fn history(args: &UserArg, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = ctx.history_limit(flags);
    let sessions = ctx.service.history(&args.user_id, limit)?;
    output(
        &json!({ "count": sessions.len(), "sessions": sessions }),
        flags.format,
    )
}

/// Handle `pass stats`.
pub fn stats(args: &UserArg, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let statistics = ctx.service.statistics(&args.user_id)?;
    output(&json!({ "statistics": statistics }), flags.format)
}

/// Handle `pass trend`.
pub fn trend(args: &TrendArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let points = ctx.service.get_trend(&args.user_id, args.series)?;
    output(
        &json!({ "series": args.series, "points": points }),
        flags.format,
    )
}

/// Handle `pass improvement`.
pub fn improvement(
    args: &ImprovementArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if let Some(dimension) = args.dimension {
        let improvement = ctx.service.calculate_improvement(&args.user_id, dimension)?;
        return output(
            &json!({ "dimension": dimension, "improvement": improvement }),
            flags.format,
        );
    }

    let improvements = ctx.service.improvements(&args.user_id)?;
    let by_dimension: Vec<_> = Dimension::ALL
        .into_iter()
        .zip(improvements)
        .map(|(dimension, improvement)| {
            json!({ "dimension": dimension, "improvement": improvement })
        })
        .collect();
    output(&json!({ "improvements": by_dimension }), flags.format)
}

/// Handle `pass compare`.
pub fn compare(args: &CompareArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let comparison =
        ctx.service
            .compare_sessions(&args.user_id, &args.first_session, &args.second_session)?;
    output(&comparison, flags.format)
}
