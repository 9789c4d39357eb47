//! Offline ledger commands.

use cashbot::CashbotConfig;
use cashbot_database::{LeaderboardCategory, LedgerRepository};
use cashbot_error::CashbotResult;
use tracing::info;

/// Create the schema if absent and apply pending migrations.
pub async fn init_db(config: &CashbotConfig) -> CashbotResult<()> {
    let database = config.database();
    database.initialize().await?;
    info!(path = %database.path(), "Database initialized");
    println!("Database ready at {}", database.path());
    Ok(())
}

/// Print one ledger record.
pub async fn show_balance(config: &CashbotConfig, user_id: u64) -> CashbotResult<()> {
    let database = config.database();
    database.initialize().await?;
    match LedgerRepository::new(database).read(user_id).await? {
        Some(record) => println!(
            "{}: {} coins, {} xp",
            record.user_id, record.coins, record.xp
        ),
        None => println!("{}: not in the system", user_id),
    }
    Ok(())
}

/// Print the top users for a category.
pub async fn show_leaderboard(
    config: &CashbotConfig,
    category: LeaderboardCategory,
) -> CashbotResult<()> {
    let database = config.database();
    database.initialize().await?;
    let top = LedgerRepository::new(database)
        .top(category, config.leaderboard.limit)
        .await?;

    if top.is_empty() {
        println!("No data found for {}.", category);
        return Ok(());
    }
    for (rank, entry) in top.iter().enumerate() {
        println!("{}. {} - {} {}", rank + 1, entry.user_id, entry.value, category);
    }
    Ok(())
}
