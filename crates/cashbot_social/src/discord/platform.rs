//! [`ChatPlatform`] backed by Discord's HTTP API.

use crate::{ChatPlatform, InviteSnapshot, Notice, SocialError, SocialErrorKind, SocialResult};
use async_trait::async_trait;
use serenity::all::{ChannelId, ChannelType, CreateEmbed, CreateMessage, GuildId, UserId};
use serenity::http::Http;
use std::sync::Arc;
use tracing::{debug, instrument};

/// HTTP status Discord answers with when a user does not accept DMs.
const FORBIDDEN: u16 = 403;

/// Discord implementation of the platform seam.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    /// Wrap an HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn message(notice: &Notice) -> CreateMessage {
        CreateMessage::new().embed(
            CreateEmbed::new()
                .title(&notice.title)
                .description(&notice.description)
                .colour(notice.colour.rgb()),
        )
    }
}

fn is_forbidden(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(e) => e.status_code().map(|s| s.as_u16()) == Some(FORBIDDEN),
        _ => false,
    }
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    #[instrument(skip(self, notice), fields(title = %notice.title))]
    async fn announce(&self, channel_id: u64, notice: &Notice) -> SocialResult<()> {
        ChannelId::new(channel_id)
            .send_message(&self.http, Self::message(notice))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, notice), fields(title = %notice.title))]
    async fn direct_message(&self, user_id: u64, notice: &Notice) -> SocialResult<()> {
        let classify = |e: serenity::Error| {
            if is_forbidden(&e) {
                SocialError::new(SocialErrorKind::RecipientUnreachable(user_id))
            } else {
                SocialError::from(e)
            }
        };

        let channel = UserId::new(user_id)
            .create_dm_channel(&self.http)
            .await
            .map_err(classify)?;
        channel
            .id
            .send_message(&self.http, Self::message(notice))
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn find_text_channel(&self, guild_id: u64, name: &str) -> SocialResult<Option<u64>> {
        let channels = self.http.get_channels(GuildId::new(guild_id)).await?;
        let found = channels
            .iter()
            .filter(|channel| channel.kind == ChannelType::Text && channel.name == name)
            .map(|channel| channel.id.get())
            .min();
        debug!(guild_id, name, found = ?found, "Looked up text channel");
        Ok(found)
    }

    async fn guild_invites(&self, guild_id: u64) -> SocialResult<Vec<InviteSnapshot>> {
        let invites = self.http.get_guild_invites(GuildId::new(guild_id)).await?;
        Ok(invites
            .into_iter()
            .map(|invite| {
                InviteSnapshot::new(
                    invite.code,
                    invite.uses,
                    invite.inviter.map(|user| user.id.get()),
                )
            })
            .collect())
    }

    async fn display_name(&self, user_id: u64) -> SocialResult<String> {
        let user = self.http.get_user(UserId::new(user_id)).await?;
        Ok(user.name)
    }
}
