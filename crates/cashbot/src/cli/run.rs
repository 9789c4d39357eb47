//! `cashbot run`: the long-running bot.

use cashbot::CashbotConfig;
use cashbot_error::{BotError, CashbotResult, ConfigError};
use cashbot_social::{BotContext, CashbotBot};
use std::sync::Arc;
use tracing::{info, instrument};

/// Migrate the database, connect to Discord and serve events until shutdown.
#[instrument(skip_all)]
pub async fn run_bot(config: &CashbotConfig, token: Option<String>) -> CashbotResult<()> {
    let token = token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ConfigError::new("DISCORD_TOKEN is not set"))?;

    let database = config.database();
    database.initialize().await?;
    info!(path = %database.path(), "Database ready");

    let context = Arc::new(BotContext::new(database, config.bot_settings()));
    let mut bot = CashbotBot::new(token, context)
        .await
        .map_err(|e| BotError::new(e.to_string()))?;
    bot.start().await.map_err(|e| BotError::new(e.to_string()))?;

    Ok(())
}
