//! Tally records how often agent rule files are used, and by whom.

use color_eyre::Result;
use tracing::{instrument, level_filters::LevelFilter};

mod cmd;

use clap::{Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Usage analytics for agent rule files.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one use of a rule file by an agent.
    Write(cmd::write::Config),

    /// Report aggregated rule usage.
    Read(cmd::read::Config),

    /// Rename a rule file, preserving its usage history.
    Rename(cmd::rename::Config),
}

#[instrument]
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logging exists for manual debugging with `TALLY_LOG` directives;
    // normal runs only emit warnings (e.g. a corrupt store being
    // replaced). The fmt layer writes to stderr so the report table on
    // stdout stays clean.
    //
    // Examples:
    // - `TALLY_LOG=debug` to log debug, info, warn, and error messages
    // - `TALLY_LOG=info` to log info, warn, and error messages
    // - `TALLY_LOG=warn` to log warn and error messages (this is the default)
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_level(true)
                .with_target(true)
                .with_writer(std::io::stderr)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("TALLY_LOG")
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Commands::Write(config) => cmd::write::main(config),
        Commands::Read(config) => cmd::read::main(config),
        Commands::Rename(config) => cmd::rename::main(config),
    }
}
