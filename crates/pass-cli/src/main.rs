use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

fn main() {
    if let Err(error) = run() {
        eprintln!("pass error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;

    let config =
        pass_config::PassConfig::load_with_dotenv().context("failed to load configuration")?;
    let norms = config
        .norms
        .load_table()
        .context("failed to load normative table")?;

    match &cli.command {
        cli::Commands::Score(args) => return commands::calc::score(args, &flags),
        cli::Commands::Standardize(args) => {
            return commands::calc::standardize(args, &norms, &flags);
        }
        cli::Commands::Norms => return commands::calc::norms(&norms, &flags),
        _ => {}
    }

    let mut ctx = context::AppContext::init(config, norms, &flags)?;
    commands::dispatch::dispatch(cli.command, &mut ctx, &flags)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PASS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
