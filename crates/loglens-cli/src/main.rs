//! loglens CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use loglens_cli::cli::{Cli, Commands};
use loglens_cli::commands::{CheckCommand, OpenCommand, PinCommand, ResolveCommand, ScanCommand};
use loglens_cli::host::StderrNotifier;
use loglens_cli::output::OutputFormat;
use loglens_cli::{CliError, Settings};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(&cli);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load(&cli)?;
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Scan(args) => {
            ScanCommand::new(&settings).execute(&mut stdout, &format, args)?;
        }
        Commands::Open(args) => {
            OpenCommand::new(&settings)
                .execute(&mut stdout, &format, &StderrNotifier, args)
                .await?;
        }
        Commands::Resolve { name } => {
            ResolveCommand::new(&settings).execute(&mut stdout, &format, name)?;
        }
        Commands::Pin { repository, version } => {
            PinCommand::new(&settings)
                .execute(&mut stdout, &format, repository, version)
                .await?;
        }
        Commands::Check { strict } => {
            CheckCommand::new(&settings).execute(&mut stdout, &format, *strict)?;
        }
    }

    Ok(())
}
