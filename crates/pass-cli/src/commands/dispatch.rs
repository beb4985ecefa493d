use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags),
        Commands::Submit(args) => commands::assessment::submit(&args, ctx, flags),
        Commands::Progress(args) => commands::assessment::progress(&args, ctx, flags),
        Commands::Reset(args) => commands::assessment::reset(&args, ctx, flags),
        Commands::Finish(args) => commands::assessment::finish(&args, ctx, flags),
        Commands::Record(args) => commands::assessment::record(&args, ctx, flags),
        Commands::Profile(args) => commands::assessment::profile(&args, ctx, flags),
        Commands::Report(args) => commands::assessment::report(&args, ctx, flags),
        Commands::History(args) => commands::history::history(&args, ctx, flags),
        Commands::Stats(args) => commands::history::stats(&args, ctx, flags),
        Commands::Trend(args) => commands::history::trend(&args, ctx, flags),
        Commands::Improvement(args) => commands::history::improvement(&args, ctx, flags),
        Commands::Compare(args) => commands::history::compare(&args, ctx, flags),
        Commands::Cohort { action } => commands::cohort::handle(&action, ctx, flags),
        Commands::Score(args) => commands::calc::score(&args, flags),
        Commands::Standardize(args) => {
            commands::calc::standardize(&args, ctx.service.norms(), flags)
        }
        Commands::Norms => commands::calc::norms(ctx.service.norms(), flags),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pass_config::PassConfig;
    use pass_core::norms::NormativeTable;
    use tempfile::TempDir;

    use super::dispatch;
    use crate::cli::Cli;
    use crate::context::AppContext;

    fn run(dir: &TempDir, args: &[&str]) -> anyhow::Result<()> {
        let data_dir = dir.path().to_string_lossy().into_owned();
        let mut argv = vec!["pass", "--quiet", "--data-dir", data_dir.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        let flags = cli.global_flags();
        let mut ctx = AppContext::init(PassConfig::default(), NormativeTable::builtin(), &flags)?;
        dispatch(cli.command, &mut ctx, &flags)
    }

    #[test]
    fn stateless_commands_dispatch_with_a_context() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["norms"]).unwrap();
        run(&dir, &["standardize", "--age", "10", "--scores", "75,72,78,70"]).unwrap();
        run(
            &dir,
            &["score", "--dimension", "planning", "--age", "10", "--correct", "8", "--total", "10"],
        )
        .unwrap();
    }

    #[test]
    fn standardize_rejects_wrong_score_count() {
        let dir = TempDir::new().unwrap();
        let err = run(&dir, &["standardize", "--age", "10", "--scores", "75,72"]).unwrap_err();
        assert!(err.to_string().contains("expected 4 scores"));
    }

    #[test]
    fn profile_of_unknown_user_fails() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir, &["profile", "usr-00000000"]).is_err());
    }
}
