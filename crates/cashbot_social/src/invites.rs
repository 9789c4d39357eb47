//! Invite snapshots and join attribution.
//!
//! The bot keeps the last observed invite list of every guild. When a member
//! joins, the fresh list is compared against that snapshot: the first invite
//! whose use count went up is taken as the one the member used, and its
//! creator is rewarded. The snapshot is replaced after every join whether or
//! not anything matched, so an unmatched change is never looked at again.

use crate::platform::{ChatPlatform, direct_message_best_effort};
use crate::{Notice, SocialResult};
use cashbot_database::LedgerRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// One invite code as observed at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InviteSnapshot {
    /// Invite code
    pub code: String,
    /// Times the code has been used
    pub uses: u64,
    /// User who created the invite, absent for vanity and widget invites
    pub inviter_id: Option<u64>,
}

impl InviteSnapshot {
    /// Create a snapshot entry.
    pub fn new(code: impl Into<String>, uses: u64, inviter_id: Option<u64>) -> Self {
        Self {
            code: code.into(),
            uses,
            inviter_id,
        }
    }
}

/// Find the invite consumed between two observations.
///
/// Scans `current` in order and returns the first invite whose code appears
/// in `previous` with a lower use count. When several counts rose, only the
/// first in iteration order is reported. Codes absent from `previous` never
/// match.
pub fn find_used_invite<'a>(
    previous: &[InviteSnapshot],
    current: &'a [InviteSnapshot],
) -> Option<&'a InviteSnapshot> {
    current.iter().find(|invite| {
        previous
            .iter()
            .any(|old| old.code == invite.code && invite.uses > old.uses)
    })
}

/// Process-wide cache of invite snapshots keyed by guild id.
///
/// Lost on restart; rebuilt when the bot becomes ready.
#[derive(Debug, Clone, Default)]
pub struct InviteCache {
    guilds: Arc<RwLock<HashMap<u64, Vec<InviteSnapshot>>>>,
}

impl InviteCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot of a guild, empty if none was taken.
    pub async fn snapshot(&self, guild_id: u64) -> Vec<InviteSnapshot> {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a guild's snapshot, returning the previous one.
    pub async fn replace(
        &self,
        guild_id: u64,
        invites: Vec<InviteSnapshot>,
    ) -> Option<Vec<InviteSnapshot>> {
        self.guilds.write().await.insert(guild_id, invites)
    }

    /// Forget a guild.
    pub async fn remove(&self, guild_id: u64) -> Option<Vec<InviteSnapshot>> {
        self.guilds.write().await.remove(&guild_id)
    }

    /// Number of guilds with a snapshot.
    pub async fn guild_count(&self) -> usize {
        self.guilds.read().await.len()
    }
}

/// A join credited to an invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Code the member joined through
    pub code: String,
    /// Creator of that code
    pub inviter_id: u64,
    /// Whether the inviter received the private congratulation
    pub inviter_notified: bool,
}

/// Tracks invites and rewards inviters when members join.
///
/// An attributed join pays the inviter `invite_coins` and nothing else; the
/// inviter gets no message-activity xp or coins for it.
#[derive(Debug, Clone)]
pub struct InviteTracker {
    cache: InviteCache,
    ledger: LedgerRepository,
    invite_coins: i64,
    welcome_channel: String,
}

impl InviteTracker {
    /// Create a tracker crediting `invite_coins` per attributed join and
    /// greeting new members in the channel named `welcome_channel`.
    pub fn new(
        cache: InviteCache,
        ledger: LedgerRepository,
        invite_coins: i64,
        welcome_channel: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            ledger,
            invite_coins,
            welcome_channel: welcome_channel.into(),
        }
    }

    /// The snapshot cache shared by this tracker.
    pub fn cache(&self) -> &InviteCache {
        &self.cache
    }

    /// Take a fresh snapshot of one guild.
    #[instrument(skip(self, platform))]
    pub async fn refresh(&self, platform: &dyn ChatPlatform, guild_id: u64) -> SocialResult<usize> {
        let invites = platform.guild_invites(guild_id).await?;
        let count = invites.len();
        self.cache.replace(guild_id, invites).await;
        debug!(count, "Cached guild invites");
        Ok(count)
    }

    /// Snapshot every guild the bot is in.
    ///
    /// A guild whose invites cannot be read (usually a missing permission) is
    /// logged and skipped so the others still get a snapshot.
    #[instrument(skip(self, platform, guild_ids), fields(guilds = guild_ids.len()))]
    pub async fn prime(&self, platform: &dyn ChatPlatform, guild_ids: &[u64]) -> usize {
        let mut primed = 0;
        for &guild_id in guild_ids {
            match self.refresh(platform, guild_id).await {
                Ok(_) => primed += 1,
                Err(e) => warn!(guild_id, error = %e, "Failed to cache guild invites"),
            }
        }
        info!(primed, "Invite cache primed");
        primed
    }

    /// Handle a member joining a guild.
    ///
    /// Ensures the member has a ledger record, attributes the join, refreshes
    /// the snapshot, then credits and notifies the inviter. Persistence and
    /// announcement failures abort the remaining steps.
    #[instrument(skip(self, platform))]
    pub async fn member_joined(
        &self,
        platform: &dyn ChatPlatform,
        guild_id: u64,
        member_id: u64,
    ) -> SocialResult<Option<Attribution>> {
        self.ledger.ensure(member_id).await?;

        let current = platform.guild_invites(guild_id).await?;
        let previous = self.cache.snapshot(guild_id).await;
        let used = find_used_invite(&previous, &current).cloned();
        self.cache.replace(guild_id, current).await;

        let Some(InviteSnapshot {
            code,
            inviter_id: Some(inviter_id),
            ..
        }) = used
        else {
            debug!("No invite attributed to join");
            return Ok(None);
        };

        self.ledger.ensure(inviter_id).await?;
        self.ledger.credit(inviter_id, self.invite_coins, 0).await?;
        info!(code = %code, inviter_id, coins = self.invite_coins, "Join attributed to invite");

        match platform
            .find_text_channel(guild_id, &self.welcome_channel)
            .await?
        {
            Some(channel_id) => {
                platform
                    .announce(channel_id, &Notice::welcome(member_id, inviter_id))
                    .await?
            }
            None => debug!(channel = %self.welcome_channel, "No welcome channel in guild"),
        }

        let inviter_notified = direct_message_best_effort(
            platform,
            inviter_id,
            &Notice::invite_success(member_id, self.invite_coins),
        )
        .await?;

        Ok(Some(Attribution {
            code,
            inviter_id,
            inviter_notified,
        }))
    }
}
