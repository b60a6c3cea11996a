//! depcheck - outdated dependency checker CLI tool
//!
//! Checks pip (requirements.txt) and npm (package.json) manifests against
//! PyPI and the npm registry, and can rewrite them with the latest versions.

use clap::Parser;
use depcheck::cli::CliArgs;
use depcheck::orchestrator::Orchestrator;
use depcheck::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code when some manifests or packages could not be checked
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "warn,depcheck=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %args.path.display(),
        write = args.write,
        "starting"
    );

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await?;

    // Honors NO_COLOR, CLICOLOR and whether stdout is a terminal
    let color = colored::control::SHOULD_COLORIZE.should_colorize();
    let output_config =
        OutputConfig::from_cli(args.json, args.diff, args.verbose, args.quiet, args.write)
            .with_color(color);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.is_partial() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
