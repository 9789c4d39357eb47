//! Chat platform seam.
//!
//! Everything the bot needs from the host platform goes through
//! [`ChatPlatform`], so the bot logic runs unchanged against Discord or an
//! in-memory double.

use crate::{InviteSnapshot, Notice, SocialResult};
use async_trait::async_trait;
use tracing::warn;

/// Operations the bot performs against the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post a notice in a channel.
    ///
    /// # Errors
    ///
    /// Returns error if the channel is unknown or the platform rejects the message.
    async fn announce(&self, channel_id: u64, notice: &Notice) -> SocialResult<()>;

    /// Send a notice privately to a user.
    ///
    /// # Errors
    ///
    /// Returns `RecipientUnreachable` when the user does not accept direct
    /// messages from the bot, or a platform error for anything else.
    async fn direct_message(&self, user_id: u64, notice: &Notice) -> SocialResult<()>;

    /// Id of the text channel called `name` in a guild.
    async fn find_text_channel(&self, guild_id: u64, name: &str) -> SocialResult<Option<u64>>;

    /// Current invites of a guild with their use counts.
    async fn guild_invites(&self, guild_id: u64) -> SocialResult<Vec<InviteSnapshot>>;

    /// Display name of a user.
    async fn display_name(&self, user_id: u64) -> SocialResult<String>;
}

/// Send a direct message without retry or escalation.
///
/// A recipient who blocks the bot is logged and ignored; `Ok(false)` reports
/// that the message was not delivered. Any other failure is returned.
pub async fn direct_message_best_effort(
    platform: &dyn ChatPlatform,
    user_id: u64,
    notice: &Notice,
) -> SocialResult<bool> {
    match platform.direct_message(user_id, notice).await {
        Ok(()) => Ok(true),
        Err(e) if e.is_recipient_unreachable() => {
            warn!(user_id, "Direct message not delivered; recipient unreachable");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
