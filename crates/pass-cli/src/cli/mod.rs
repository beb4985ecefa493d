use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pass` binary.
#[derive(Debug, Parser)]
#[command(name = "pass", version, about = "PASS cognitive assessment scoring and statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max history sessions to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store directory (overrides storage.data_dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pass_core::enums::{Dimension, Gender, TrendSeries};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::{CohortCommands, UserCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "pass",
            "--format",
            "raw",
            "--limit",
            "10",
            "--verbose",
            "cohort",
            "completion",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Cohort {
                action: CohortCommands::Completion
            }
        ));
    }

    #[test]
    fn user_add_parses_typed_values() {
        let cli = Cli::try_parse_from([
            "pass", "user", "add", "Ana", "--age", "10", "--gender", "f",
        ])
        .expect("cli should parse");
        let Commands::User {
            action: UserCommands::Add { name, age, gender },
        } = cli.command
        else {
            panic!("expected user add");
        };
        assert_eq!(name, "Ana");
        assert_eq!(age, 10);
        assert_eq!(gender, Gender::Female);
    }

    #[test]
    fn submit_collects_reaction_times() {
        let cli = Cli::try_parse_from([
            "pass",
            "submit",
            "usr-00000001",
            "--dimension",
            "attention",
            "--sub-test",
            "2",
            "--correct",
            "8",
            "--total",
            "10",
            "--rt",
            "900,1100.5",
        ])
        .expect("cli should parse");
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.dimension, Dimension::Attention);
        assert_eq!(args.sub_test, 2);
        assert_eq!(args.rt, vec![900.0, 1100.5]);
    }

    #[test]
    fn trend_accepts_overall() {
        let cli = Cli::try_parse_from(["pass", "trend", "usr-00000001", "overall"])
            .expect("cli should parse");
        let Commands::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.series, TrendSeries::Overall);
    }

    #[test]
    fn profile_takes_a_user_id() {
        let cli =
            Cli::try_parse_from(["pass", "profile", "usr-00000001"]).expect("cli should parse");
        let Commands::Profile(args) = cli.command else {
            panic!("expected profile");
        };
        assert_eq!(args.user_id, "usr-00000001");
    }

    #[test]
    fn unknown_dimension_is_rejected() {
        assert!(
            Cli::try_parse_from(["pass", "improvement", "usr-00000001", "memory"]).is_err()
        );
    }

    #[test]
    fn sub_test_index_is_range_checked() {
        assert!(
            Cli::try_parse_from([
                "pass",
                "submit",
                "usr-00000001",
                "--dimension",
                "planning",
                "--sub-test",
                "3",
                "--correct",
                "1",
                "--total",
                "2",
            ])
            .is_err()
        );
    }
}
