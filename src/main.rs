//! apisense CLI entry point

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use apisense::cli::{Cli, Commands};
use apisense::commands::{
    run_aggregate, run_all, run_extract, run_package, run_scan, run_select, run_vectorize,
    CommandContext,
};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> apisense::Result<String> {
    let ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Commands::Extract(args) => run_extract(&ctx, args),
        Commands::Package(args) => run_package(&ctx, args),
        Commands::Scan(args) => run_scan(&ctx, args),
        Commands::Aggregate(args) => run_aggregate(&ctx, args),
        Commands::Select(args) => run_select(&ctx, args),
        Commands::Vectorize(args) => run_vectorize(&ctx, args),
        Commands::Run(args) => run_all(&ctx, args),
    }
}

/// Logs go to stderr so stdout carries only command output. `RUST_LOG`
/// overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose { "apisense=debug" } else { "apisense=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
