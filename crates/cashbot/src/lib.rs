//! cashbot - a Discord community bot.
//!
//! cashbot keeps an experience and coin ledger for every member, rewards
//! members whose invites bring new people in, and runs timed giveaways that
//! cost coins to enter.
//!
//! # Architecture
//!
//! - `cashbot_error` - Error types
//! - `cashbot_database` - SQLite ledger and giveaway persistence
//! - `cashbot_social` - Bot logic and the Discord adapter
//!
//! This crate adds layered configuration and log setup, and re-exports the
//! rest for convenience.

#![warn(missing_docs)]

mod config;
mod observability;

pub use config::{
    BotSection, CashbotConfig, DEFAULT_CONFIG, DatabaseSection, GiveawaySection,
    LeaderboardSection, LoggingSection, RewardsSection,
};
pub use observability::{ObservabilityConfig, init_observability};

pub use cashbot_database::*;
pub use cashbot_error::*;
pub use cashbot_social::*;
