//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the cashbot binary.

mod commands;
mod ledger;
mod run;

pub use commands::{Cli, Commands, ConfigArgs};
pub use ledger::{init_db, show_balance, show_leaderboard};
pub use run::run_bot;
