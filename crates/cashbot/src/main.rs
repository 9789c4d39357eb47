//! cashbot binary.
//!
//! Runs the Discord bot, or inspects its ledger offline.

use cashbot::{CashbotConfig, ObservabilityConfig, init_observability};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, init_db, run_bot, show_balance, show_leaderboard};

    // Pick up DISCORD_TOKEN and CASHBOT_* from .env before clap reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        token: std::env::var("DISCORD_TOKEN").ok(),
        config: Default::default(),
    });

    let config = CashbotConfig::load(command.config_args().config.as_deref())?;

    init_observability(
        &ObservabilityConfig::new(config.logging.level.clone())
            .with_json_logs(config.logging.json_logs)
            .with_verbose(cli.verbose),
    )?;

    match command {
        Commands::Run { token, .. } => run_bot(&config, token).await?,
        Commands::InitDb { .. } => init_db(&config).await?,
        Commands::Balance { user_id, .. } => show_balance(&config, user_id).await?,
        Commands::Leaderboard { category, .. } => show_leaderboard(&config, category).await?,
        Commands::Config { .. } => print!("{}", config.to_toml()?),
    }

    Ok(())
}
