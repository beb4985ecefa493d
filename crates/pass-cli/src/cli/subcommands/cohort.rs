use clap::Subcommand;

/// Cohort statistics commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CohortCommands {
    /// Per-dimension descriptive statistics.
    Stats,
    /// Dimension means by gender.
    Gender,
    /// Dimension means by age group.
    Age,
    /// Pearson correlation between dimensions.
    Correlation,
    /// Tukey IQR outliers per dimension.
    Outliers,
    /// Assessment completion counts.
    Completion,
}
