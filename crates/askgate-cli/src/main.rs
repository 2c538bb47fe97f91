//! CLI entry point - the composition root.
//!
//! The only place where configuration, the ask capability and the
//! notification sink are wired together.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use askgate_cli::{Cli, CliError, Commands, TerminalNotifier, config, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1)))
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let notifier = TerminalNotifier;

    match &cli.command {
        Commands::Start(args) => {
            let gateway = config::serve_config(&cli, args)?;
            let ask = config::ask_adapter(args)?;
            handlers::start::execute(gateway, Arc::new(ask), Arc::new(notifier)).await?;
        }
        Commands::Kill => {
            let target = config::target_config(&cli)?;
            handlers::kill::execute(&target, &notifier).await?;
        }
        Commands::Status => {
            let target = config::target_config(&cli)?;
            if !handlers::status::execute(&target).await {
                return Ok(ExitCode::from(3));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
