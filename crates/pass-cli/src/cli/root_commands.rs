use clap::{Args, Subcommand};
use pass_core::enums::{AgeGroup, Dimension, TrendSeries};

use crate::cli::subcommands::{CohortCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// User directory.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Score a finished sub-test and store it.
    Submit(SubmitArgs),
    /// Show the in-progress assessment.
    Progress(UserArg),
    /// Clear the in-progress assessment, keeping history.
    Reset(UserArg),
    /// Append the completed assessment to history.
    Finish(UserArg),
    /// Append raw dimension totals directly as a history session.
    Record(RecordArgs),
    /// Standardized profile of the in-progress totals.
    Profile(UserArg),
    /// Full report with standardized scores and advice.
    Report(UserArg),
    /// Session history, oldest first.
    History(UserArg),
    /// Statistics summary over all sessions.
    Stats(UserArg),
    /// Trend of one dimension's percentile or the overall average.
    Trend(TrendArgs),
    /// First-to-last change of one dimension.
    Improvement(ImprovementArgs),
    /// Deltas between two sessions.
    Compare(CompareArgs),
    /// Statistics across all users.
    Cohort {
        #[command(subcommand)]
        action: CohortCommands,
    },
    /// Compute a sub-test score without storing anything.
    Score(ScoreArgs),
    /// Standardize raw totals without storing anything.
    Standardize(StandardizeArgs),
    /// Print the normative table in effect.
    Norms,
}

#[derive(Clone, Debug, Args)]
pub struct UserArg {
    pub user_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    pub user_id: String,
    #[arg(long)]
    pub dimension: Dimension,
    /// Sub-test index within the dimension (0-2).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub sub_test: u8,
    #[arg(long)]
    pub correct: u32,
    #[arg(long)]
    pub total: u32,
    /// Reaction times in milliseconds, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub rt: Vec<f64>,
}

#[derive(Clone, Debug, Args)]
pub struct RecordArgs {
    pub user_id: String,
    /// Raw totals in canonical order: planning,attention,simultaneous,successive.
    #[arg(long, value_delimiter = ',', required = true)]
    pub scores: Vec<f64>,
    /// Age group to standardize against (defaults to the user's).
    #[arg(long)]
    pub age_group: Option<AgeGroup>,
    #[arg(long, default_value_t = 0)]
    pub duration_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TrendArgs {
    pub user_id: String,
    /// A dimension name or `overall`.
    pub series: TrendSeries,
}

#[derive(Clone, Debug, Args)]
pub struct ImprovementArgs {
    pub user_id: String,
    /// Omit for all four dimensions.
    pub dimension: Option<Dimension>,
}

#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    pub user_id: String,
    pub first_session: String,
    pub second_session: String,
}

#[derive(Clone, Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub dimension: Dimension,
    /// Participant age; the age group is derived from it.
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub correct: u32,
    #[arg(long)]
    pub total: u32,
    #[arg(long, value_delimiter = ',')]
    pub rt: Vec<f64>,
}

#[derive(Clone, Debug, Args)]
pub struct StandardizeArgs {
    /// Participant age; the age group is derived from it.
    #[arg(long)]
    pub age: u32,
    /// Raw totals in canonical order: planning,attention,simultaneous,successive.
    #[arg(long, value_delimiter = ',', required = true)]
    pub scores: Vec<f64>,
}
