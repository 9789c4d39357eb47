//! CLI command definitions.

use cashbot_database::LeaderboardCategory;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// cashbot - Discord community bot with coins, invite rewards and giveaways
#[derive(Parser, Debug)]
#[command(name = "cashbot")]
#[command(about = "Discord community bot with coins, invite rewards and giveaways", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file to use instead of ./cashbot.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and run the bot
    Run {
        /// Discord bot token
        #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Create or migrate the database, then exit
    InitDb {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print a user's ledger record
    Balance {
        /// Discord user id
        user_id: u64,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the top users by coins or xp
    Leaderboard {
        /// Ranking column
        #[arg(default_value = "coins")]
        category: LeaderboardCategory,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

impl Commands {
    /// Configuration options of this command.
    pub fn config_args(&self) -> &ConfigArgs {
        match self {
            Commands::Run { config, .. }
            | Commands::InitDb { config }
            | Commands::Balance { config, .. }
            | Commands::Leaderboard { config, .. }
            | Commands::Config { config } => config,
        }
    }
}
