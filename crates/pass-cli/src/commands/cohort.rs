use pass_core::cohort;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CohortCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pass cohort`.
pub fn handle(
    action: &CohortCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let members = ctx.service.cohort()?;
    tracing::debug!(members = members.len(), "cohort snapshot loaded");

    match action {
        CohortCommands::Stats => output(&cohort::descriptive_stats(&members), flags.format),
        CohortCommands::Gender => output(&cohort::compare_by_gender(&members), flags.format),
        CohortCommands::Age => output(&cohort::compare_by_age_group(&members), flags.format),
        CohortCommands::Correlation => output(&cohort::correlate(&members), flags.format),
        CohortCommands::Outliers => output(&cohort::detect_outliers(&members), flags.format),
        CohortCommands::Completion => output(&cohort::completion_stats(&members), flags.format),
    }
}
