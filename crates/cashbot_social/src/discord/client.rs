//! Discord bot client setup and lifecycle management.

use super::CashbotHandler;
use crate::{BotContext, SocialError, SocialErrorKind, SocialResult};
use serenity::Client;
use std::sync::Arc;
use tracing::{info, instrument};

/// Main Discord bot client for cashbot.
///
/// # Example
/// ```no_run
/// use cashbot_database::Database;
/// use cashbot_social::{BotContext, BotSettings, CashbotBot};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let db = Database::new("cashbot.db");
///     db.initialize().await?;
///
///     let context = Arc::new(BotContext::new(db, BotSettings::default()));
///     let mut bot = CashbotBot::new(token, context).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct CashbotBot {
    client: Client,
}

impl CashbotBot {
    /// Create a new bot instance.
    ///
    /// # Errors
    /// Returns an error if the token is empty or the Serenity client fails
    /// to initialize.
    #[instrument(skip(token, context), fields(token_len = token.len()))]
    pub async fn new(token: String, context: Arc<BotContext>) -> SocialResult<Self> {
        if token.trim().is_empty() {
            return Err(SocialError::new(SocialErrorKind::Configuration(
                "Discord token is empty".to_string(),
            )));
        }
        info!("Initializing cashbot Discord bot");

        let handler = CashbotHandler::new(context);
        let intents = CashbotHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                SocialError::new(SocialErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");
        Ok(Self { client })
    }

    /// Start the Discord bot.
    ///
    /// This method blocks until the bot is shut down.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SocialResult<()> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            SocialError::new(SocialErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;

        Ok(())
    }
}
