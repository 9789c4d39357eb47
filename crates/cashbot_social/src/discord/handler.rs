//! Serenity event handler for the cashbot Discord bot.
//!
//! Each event is translated into a [`BotContext`] call. Failures are logged;
//! nothing is reported back to the gateway.

use super::SerenityPlatform;
use crate::{BotContext, ChatPlatform, IncomingMessage};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::event::{InviteCreateEvent, InviteDeleteEvent};
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::guild::{Guild, Member, UnavailableGuild};
use std::sync::Arc;
use tracing::{error, info};

/// Event handler for the cashbot Discord bot.
pub struct CashbotHandler {
    context: Arc<BotContext>,
}

impl CashbotHandler {
    /// Create a handler dispatching into `context`.
    pub fn new(context: Arc<BotContext>) -> Self {
        Self { context }
    }

    /// Required gateway intents for the bot.
    ///
    /// Member joins and invite events need the privileged members intent and
    /// the invites intent respectively.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_INVITES
    }

    fn platform(ctx: &Context) -> Arc<dyn ChatPlatform> {
        Arc::new(SerenityPlatform::new(ctx.http.clone()))
    }

    async fn invites_changed(&self, ctx: &Context, guild_id: Option<u64>) {
        let Some(guild_id) = guild_id else {
            return;
        };
        let platform = Self::platform(ctx);
        if let Err(e) = self
            .context
            .on_invites_changed(platform.as_ref(), guild_id)
            .await
        {
            error!(guild_id, error = %e, "Failed to refresh invites");
        }
    }
}

#[async_trait]
impl EventHandler for CashbotHandler {
    /// Called when the bot successfully connects to Discord.
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        let guild_ids: Vec<u64> = ready.guilds.iter().map(|g| g.id.get()).collect();
        let now = chrono::Utc::now().timestamp();
        if let Err(e) = self
            .context
            .on_ready(Self::platform(&ctx), &guild_ids, now)
            .await
        {
            error!(error = %e, "Failed to finish startup");
        }
    }

    /// Called for every message the bot can see.
    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = IncomingMessage {
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            channel_id: msg.channel_id.get(),
            content: msg.content.clone(),
            sent_at: msg.timestamp.unix_timestamp(),
        };
        if let Err(e) = self
            .context
            .on_message(Self::platform(&ctx), &incoming)
            .await
        {
            error!(
                message_id = %msg.id,
                author_id = %msg.author.id,
                error = %e,
                "Failed to handle message"
            );
        }
    }

    /// Called when a new member joins a guild.
    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        info!(
            guild_id = %new_member.guild_id,
            user_id = %new_member.user.id,
            username = %new_member.user.name,
            "Member joined guild"
        );
        let platform = Self::platform(&ctx);
        match self
            .context
            .on_member_join(
                platform.as_ref(),
                new_member.guild_id.get(),
                new_member.user.id.get(),
            )
            .await
        {
            Ok(Some(attribution)) => info!(
                code = %attribution.code,
                inviter_id = attribution.inviter_id,
                "Join attributed"
            ),
            Ok(None) => {}
            Err(e) => error!(
                guild_id = %new_member.guild_id,
                user_id = %new_member.user.id,
                error = %e,
                "Failed to handle member join"
            ),
        }
    }

    /// Called when a guild becomes available, including guilds joined after ready.
    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        let guild_id = guild.id.get();
        let platform = Self::platform(&ctx);
        if let Err(e) = self
            .context
            .on_guild_available(platform.as_ref(), guild_id)
            .await
        {
            error!(guild_id, error = %e, "Failed to cache guild invites");
        }
    }

    /// Called when the bot leaves a guild or a guild becomes unavailable.
    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        info!(
            guild_id = %incomplete.id,
            unavailable = incomplete.unavailable,
            "Guild unavailable or left"
        );
        self.context
            .on_guild_removed(incomplete.id.get(), incomplete.unavailable)
            .await;
    }

    /// Called when an invite is created.
    async fn invite_create(&self, ctx: Context, data: InviteCreateEvent) {
        self.invites_changed(&ctx, data.guild_id.map(|id| id.get()))
            .await;
    }

    /// Called when an invite is deleted.
    async fn invite_delete(&self, ctx: Context, data: InviteDeleteEvent) {
        self.invites_changed(&ctx, data.guild_id.map(|id| id.get()))
            .await;
    }
}
