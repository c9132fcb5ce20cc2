//! AccessChain command-line administration tool.

mod commands;
mod config;
mod display;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "accesschain", about = "Grant administration on KRNL-verified rails")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "accesschain.toml", env = "ACCESSCHAIN_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verification lifecycle for a subject address.
    Verify {
        #[command(subcommand)]
        action: commands::verify::VerifyAction,
    },
    /// Grant administration.
    Grant {
        #[command(subcommand)]
        action: commands::grant::GrantAction,
    },
    /// NGO registry administration.
    Ngo {
        #[command(subcommand)]
        action: commands::ngo::NgoAction,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config::AppConfig::load(&cli.config)?;
    tracing::info!(
        network = %config.network.name,
        chain = config.network.chain_id,
        "configuration loaded"
    );

    match cli.command {
        Command::Verify { action } => commands::verify::run(&config, action).await,
        Command::Grant { action } => commands::grant::run(&config, action).await,
        Command::Ngo { action } => commands::ngo::run(&config, action).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
