//! Shared bot state and event entry points.
//!
//! [`BotContext`] is what a platform adapter holds on to: every event it
//! receives is translated into one of the `on_*` calls below.

use crate::commands::{BotCommand, parse_command};
use crate::giveaway::{GiveawayRequest, GiveawayService};
use crate::invites::{Attribution, InviteCache, InviteTracker};
use crate::platform::ChatPlatform;
use crate::{MessageRewards, Notice, SocialResult, mention};
use cashbot_database::{Database, GiveawayRepository, LeaderboardCategory, LedgerRepository};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Tunable bot behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    /// Prefix that marks a message as a command
    pub command_prefix: String,
    /// Name of the channel welcome notices are posted in
    pub welcome_channel: String,
    /// Experience credited per message
    pub message_xp: i64,
    /// Coins credited per message
    pub message_coins: i64,
    /// Coins credited to an inviter per attributed join
    pub invite_coins: i64,
    /// Coins debited per giveaway entry
    pub entry_cost: i64,
    /// Rows shown by the leaderboard
    pub leaderboard_limit: i64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            welcome_channel: "general".to_string(),
            message_xp: 10,
            message_coins: 5,
            invite_coins: 50,
            entry_cost: 100,
            leaderboard_limit: 10,
        }
    }
}

/// A message as seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Author's user id
    pub author_id: u64,
    /// Whether the author is a bot account
    pub author_is_bot: bool,
    /// Channel the message was posted in
    pub channel_id: u64,
    /// Raw text
    pub content: String,
    /// Unix timestamp (seconds) the message was sent at
    pub sent_at: i64,
}

/// Bot state shared across event handlers.
#[derive(Debug, Clone)]
pub struct BotContext {
    settings: BotSettings,
    database: Database,
    ledger: LedgerRepository,
    rewards: MessageRewards,
    invites: InviteTracker,
    giveaways: GiveawayService,
}

impl BotContext {
    /// Wire every service over one database.
    pub fn new(database: Database, settings: BotSettings) -> Self {
        let ledger = LedgerRepository::new(database.clone());
        let rewards = MessageRewards::new(
            ledger.clone(),
            settings.message_xp,
            settings.message_coins,
        );
        let invites = InviteTracker::new(
            InviteCache::new(),
            ledger.clone(),
            settings.invite_coins,
            settings.welcome_channel.clone(),
        );
        let giveaways = GiveawayService::new(
            GiveawayRepository::new(database.clone()),
            settings.entry_cost,
            settings.command_prefix.clone(),
        );
        Self {
            settings,
            database,
            ledger,
            rewards,
            invites,
            giveaways,
        }
    }

    /// Settings in effect.
    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    /// The backing database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Ledger repository.
    pub fn ledger(&self) -> &LedgerRepository {
        &self.ledger
    }

    /// Invite tracker.
    pub fn invites(&self) -> &InviteTracker {
        &self.invites
    }

    /// Giveaway service.
    pub fn giveaways(&self) -> &GiveawayService {
        &self.giveaways
    }

    /// Client connected: snapshot invites of every guild and re-arm open giveaways.
    #[instrument(skip(self, platform, guild_ids), fields(guilds = guild_ids.len()))]
    pub async fn on_ready(
        &self,
        platform: Arc<dyn ChatPlatform>,
        guild_ids: &[u64],
        now: i64,
    ) -> SocialResult<Vec<JoinHandle<()>>> {
        let primed = self.invites.prime(platform.as_ref(), guild_ids).await;
        let timers = self.giveaways.recover(platform, now).await?;
        info!(primed, recovered = timers.len(), "Bot ready");
        Ok(timers)
    }

    /// A member joined a guild.
    pub async fn on_member_join(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
        member_id: u64,
    ) -> SocialResult<Option<Attribution>> {
        self.invites.member_joined(platform, guild_id, member_id).await
    }

    /// An invite was created or deleted in a guild.
    pub async fn on_invites_changed(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
    ) -> SocialResult<()> {
        self.invites.refresh(platform, guild_id).await?;
        Ok(())
    }

    /// A guild became available, either after an outage or because the bot
    /// was added to it. Its invite snapshot is retaken.
    pub async fn on_guild_available(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
    ) -> SocialResult<()> {
        self.invites.refresh(platform, guild_id).await?;
        Ok(())
    }

    /// A guild was removed from the bot's view.
    ///
    /// When `unavailable` is set the guild is only in an outage and keeps its
    /// snapshot; otherwise the bot left and the snapshot is dropped.
    pub async fn on_guild_removed(&self, guild_id: u64, unavailable: bool) {
        if unavailable {
            debug!(guild_id, "Guild unavailable, keeping invite snapshot");
            return;
        }
        if self.invites.cache().remove(guild_id).await.is_some() {
            debug!(guild_id, "Dropped invite snapshot");
        }
    }

    /// A message was posted.
    ///
    /// Bot authors are ignored. Everyone else is rewarded first, then the
    /// message is handled as a command if it is one.
    #[instrument(skip(self, platform, message), fields(author_id = message.author_id, channel_id = message.channel_id))]
    pub async fn on_message(
        &self,
        platform: Arc<dyn ChatPlatform>,
        message: &IncomingMessage,
    ) -> SocialResult<()> {
        if message.author_is_bot {
            return Ok(());
        }
        self.rewards.record_message(message.author_id).await?;

        let prefix = &self.settings.command_prefix;
        match parse_command(prefix, &message.content) {
            None => Ok(()),
            Some(Err(e)) => {
                debug!(error = %e, "Malformed command");
                platform
                    .announce(message.channel_id, &Notice::usage(&e.usage(prefix)))
                    .await
            }
            Some(Ok(command)) => self.dispatch(platform, message, command).await,
        }
    }

    async fn dispatch(
        &self,
        platform: Arc<dyn ChatPlatform>,
        message: &IncomingMessage,
        command: BotCommand,
    ) -> SocialResult<()> {
        let channel_id = message.channel_id;
        let user_id = message.author_id;
        debug!(?command, "Dispatching command");

        match command {
            BotCommand::StartGiveaway {
                duration,
                num_winners,
                prize,
            } => match GiveawayRequest::parse(&duration, num_winners, &prize) {
                Ok(request) => {
                    // The timer runs detached.
                    let (giveaway, _timer) = self
                        .giveaways
                        .start(platform, channel_id, request, message.sent_at)
                        .await?;
                    info!(giveaway_id = giveaway.id, "Giveaway started");
                    Ok(())
                }
                Err(rejection) => platform.announce(channel_id, &rejection.notice()).await,
            },
            BotCommand::EnterGiveaway => {
                let outcome = self.giveaways.enter(user_id).await?;
                let notice = self.giveaways.entry_notice(user_id, outcome);
                platform.announce(channel_id, &notice).await
            }
            BotCommand::Balance => {
                let notice = match self.ledger.read(user_id).await? {
                    Some(record) => Notice::balance(user_id, record.coins, record.xp),
                    None => Notice::not_in_system(user_id),
                };
                platform.announce(channel_id, &notice).await
            }
            BotCommand::Leaderboard { category } => {
                let notice = self
                    .leaderboard_notice(platform.as_ref(), category.as_deref())
                    .await?;
                platform.announce(channel_id, &notice).await
            }
        }
    }

    /// Build the leaderboard notice for a raw category argument.
    pub async fn leaderboard_notice(
        &self,
        platform: &dyn ChatPlatform,
        category: Option<&str>,
    ) -> SocialResult<Notice> {
        let category = match category {
            None => LeaderboardCategory::default(),
            Some(text) => match text.parse::<LeaderboardCategory>() {
                Ok(category) => category,
                Err(_) => return Ok(Notice::invalid_category()),
            },
        };

        let limit = self.settings.leaderboard_limit;
        let top = self.ledger.top(category, limit).await?;
        if top.is_empty() {
            return Ok(Notice::no_data(category));
        }

        let mut rows = Vec::with_capacity(top.len());
        for entry in top {
            let name = match platform.display_name(entry.user_id).await {
                Ok(name) => name,
                Err(e) => {
                    debug!(user_id = entry.user_id, error = %e, "Name lookup failed");
                    mention(entry.user_id)
                }
            };
            rows.push((name, entry.value));
        }
        Ok(Notice::leaderboard(category, limit, &rows))
    }
}
