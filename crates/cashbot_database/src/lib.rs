//! SQLite persistence for cashbot.
//!
//! This crate owns the schema and the repositories that mutate it:
//!
//! - [`LedgerRepository`] - per-user experience and coin balances
//! - [`GiveawayRepository`] - giveaway instances and their entries
//!
//! Connections are never shared. [`Database::run`] opens one for the duration
//! of a single operation and closes it on every exit path.
//!
//! # Example
//!
//! ```rust,no_run
//! use cashbot_database::{Database, LedgerRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("cashbot.db");
//! db.initialize().await?;
//!
//! let ledger = LedgerRepository::new(db);
//! ledger.ensure(42).await?;
//! ledger.credit(42, 5, 10).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod connection;
mod giveaway_repository;
mod ledger;
mod models;

/// Diesel table definitions.
pub mod schema;

pub use connection::{Database, MIGRATIONS, from_db_id, run_migrations, to_db_id};
pub use giveaway_repository::{
    EntryOutcome, GiveawayDraft, GiveawayRepository, ResolveOutcome, draw_winners,
};
pub use ledger::{LeaderboardCategory, LeaderboardEntry, LedgerRepository};
pub use models::{GiveawayEntryRow, GiveawayRow, GiveawayStatus, LedgerRecord, NewGiveaway, UserRow};

use cashbot_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
