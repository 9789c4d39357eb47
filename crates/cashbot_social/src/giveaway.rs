//! Timed giveaways.
//!
//! A giveaway moves from accepting entries to resolving when its timer
//! fires. Each start is its own instance in the database; the timer spawned
//! for it only resolves that instance, and becomes a no-op if a later start
//! superseded it. Timers have no cancellation handle.

use crate::platform::ChatPlatform;
use crate::{Notice, SocialResult};
use cashbot_database::{
    EntryOutcome, GiveawayDraft, GiveawayRepository, GiveawayRow, ResolveOutcome,
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([smhd])$").expect("Valid duration regex"));

/// Parse `<integer><unit>` with unit one of `s`, `m`, `h`, `d` into seconds.
///
/// Returns `None` for any other form, and for amounts that overflow.
///
/// # Example
/// ```
/// use cashbot_social::parse_duration_secs;
///
/// assert_eq!(parse_duration_secs("2m"), Some(120));
/// assert_eq!(parse_duration_secs("30x"), None);
/// ```
pub fn parse_duration_secs(input: &str) -> Option<u64> {
    let captures = DURATION_PATTERN.captures(input)?;
    let amount: u64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = match captures.get(2)?.as_str() {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => return None,
    };
    amount.checked_mul(unit)
}

/// Parse a giveaway duration into a [`Duration`].
pub fn parse_duration(input: &str) -> Option<Duration> {
    parse_duration_secs(input).map(Duration::from_secs)
}

/// Why a giveaway could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GiveawayValidation {
    /// The duration is not `<integer><s|m|h|d>`.
    #[display("invalid duration")]
    InvalidDuration,
    /// Fewer than one winner was requested.
    #[display("invalid winner count")]
    InvalidWinnerCount,
}

impl GiveawayValidation {
    /// Rejection notice for the user.
    pub fn notice(self) -> Notice {
        match self {
            GiveawayValidation::InvalidDuration => Notice::invalid_duration(),
            GiveawayValidation::InvalidWinnerCount => Notice::invalid_winner_count(),
        }
    }
}

/// A validated request to start a giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayRequest {
    /// Duration as the user wrote it
    pub duration_text: String,
    /// Parsed duration
    pub duration: Duration,
    /// Number of winners, at least one
    pub num_winners: u32,
    /// Free-text prize
    pub prize: String,
}

impl GiveawayRequest {
    /// Validate raw command arguments.
    ///
    /// The duration is checked before the winner count.
    pub fn parse(duration: &str, num_winners: i64, prize: &str) -> Result<Self, GiveawayValidation> {
        let secs = parse_duration_secs(duration).ok_or(GiveawayValidation::InvalidDuration)?;
        if num_winners < 1 {
            return Err(GiveawayValidation::InvalidWinnerCount);
        }
        let num_winners =
            u32::try_from(num_winners).map_err(|_| GiveawayValidation::InvalidWinnerCount)?;
        Ok(Self {
            duration_text: duration.to_string(),
            duration: Duration::from_secs(secs),
            num_winners,
            prize: prize.to_string(),
        })
    }
}

/// Starts, enters and resolves giveaways, announcing each step.
#[derive(Debug, Clone)]
pub struct GiveawayService {
    repository: GiveawayRepository,
    entry_cost: i64,
    command_prefix: String,
}

impl GiveawayService {
    /// Create a service charging `entry_cost` coins per entry.
    ///
    /// `command_prefix` is quoted in the start announcement.
    pub fn new(
        repository: GiveawayRepository,
        entry_cost: i64,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            entry_cost,
            command_prefix: command_prefix.into(),
        }
    }

    /// Coins debited per entry.
    pub fn entry_cost(&self) -> i64 {
        self.entry_cost
    }

    /// The underlying repository.
    pub fn repository(&self) -> &GiveawayRepository {
        &self.repository
    }

    /// Start a giveaway in `channel_id` and schedule its resolution.
    ///
    /// Entries of any earlier giveaway are purged first. Returns the new
    /// instance together with the handle of its timer task.
    #[instrument(skip(self, platform, request), fields(prize = %request.prize))]
    pub async fn start(
        &self,
        platform: Arc<dyn ChatPlatform>,
        channel_id: u64,
        request: GiveawayRequest,
        now: i64,
    ) -> SocialResult<(GiveawayRow, JoinHandle<()>)> {
        let secs = i64::try_from(request.duration.as_secs()).unwrap_or(i64::MAX);
        let giveaway = self
            .repository
            .start(GiveawayDraft {
                channel_id,
                prize: request.prize.clone(),
                num_winners: request.num_winners,
                started_at: now,
                ends_at: now.saturating_add(secs),
            })
            .await?;

        platform
            .announce(
                channel_id,
                &Notice::giveaway_started(
                    &request.prize,
                    &request.duration_text,
                    request.num_winners,
                    &self.command_prefix,
                ),
            )
            .await?;

        let timer = self.schedule(platform, giveaway.id, request.duration);
        Ok((giveaway, timer))
    }

    /// Enter `user_id` into the running giveaway.
    pub async fn enter(&self, user_id: u64) -> SocialResult<EntryOutcome> {
        Ok(self.repository.enter(user_id, self.entry_cost).await?)
    }

    /// Notice answering an entry attempt.
    pub fn entry_notice(&self, user_id: u64, outcome: EntryOutcome) -> Notice {
        match outcome {
            EntryOutcome::Entered { .. } => Notice::entry_confirmed(user_id),
            EntryOutcome::InsufficientFunds { cost, .. } => Notice::not_enough_coins(user_id, cost),
            EntryOutcome::AlreadyEntered => Notice::already_entered(user_id),
            EntryOutcome::NoActiveGiveaway => Notice::no_active_giveaway(user_id),
        }
    }

    /// Resolve a giveaway and announce the result in its channel.
    ///
    /// A giveaway that is no longer open resolves silently.
    #[instrument(skip(self, platform))]
    pub async fn resolve_and_announce(
        &self,
        platform: &dyn ChatPlatform,
        giveaway_id: i64,
    ) -> SocialResult<ResolveOutcome> {
        let outcome = self.repository.resolve(giveaway_id).await?;
        match &outcome {
            ResolveOutcome::Resolved { giveaway, winners } => {
                platform
                    .announce(
                        giveaway.channel(),
                        &Notice::giveaway_ended(&giveaway.prize, winners),
                    )
                    .await?;
            }
            ResolveOutcome::Undersubscribed { giveaway, .. } => {
                platform
                    .announce(giveaway.channel(), &Notice::not_enough_participants())
                    .await?;
            }
            ResolveOutcome::Closed { giveaway } => {
                warn!(status = %giveaway.status, "Timer fired for a giveaway that is no longer open");
            }
            ResolveOutcome::NotFound => warn!("Timer fired for an unknown giveaway"),
        }
        Ok(outcome)
    }

    /// Spawn a timer that resolves `giveaway_id` after `delay`.
    ///
    /// Failures inside the timer are logged; nothing retries them.
    pub fn schedule(
        &self,
        platform: Arc<dyn ChatPlatform>,
        giveaway_id: i64,
        delay: Duration,
    ) -> JoinHandle<()> {
        let service = self.clone();
        debug!(giveaway_id, delay_secs = delay.as_secs(), "Scheduling giveaway resolution");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = service
                .resolve_and_announce(platform.as_ref(), giveaway_id)
                .await
            {
                error!(giveaway_id, error = %e, "Failed to resolve giveaway");
            }
        })
    }

    /// Re-arm timers for giveaways left open by a previous run.
    ///
    /// Giveaways already past their end resolve immediately.
    #[instrument(skip(self, platform))]
    pub async fn recover(
        &self,
        platform: Arc<dyn ChatPlatform>,
        now: i64,
    ) -> SocialResult<Vec<JoinHandle<()>>> {
        let open = self.repository.open_giveaways().await?;
        if !open.is_empty() {
            info!(count = open.len(), "Recovering open giveaways");
        }
        Ok(open
            .iter()
            .map(|giveaway| {
                let delay = Duration::from_secs(giveaway.remaining_secs(now));
                self.schedule(platform.clone(), giveaway.id, delay)
            })
            .collect())
    }
}
