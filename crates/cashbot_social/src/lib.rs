//! Community bot logic for cashbot.
//!
//! The bot rewards activity, credits inviters when the members they invited
//! join, and runs timed giveaways that cost coins to enter. Everything here is
//! platform independent; the host platform is reached through
//! [`ChatPlatform`].
//!
//! # Components
//!
//! - [`MessageRewards`] - experience and coins per message
//! - [`InviteTracker`] - invite snapshots and join attribution
//! - [`GiveawayService`] - giveaway start, entry, timed resolution
//! - [`parse_command`] - prefix text commands
//! - [`BotContext`] - the above wired together behind event entry points
//!
//! # Platform Support
//!
//! - `discord` - Serenity client, event handler and [`ChatPlatform`]
//!   implementation (requires `discord` feature)

#![warn(missing_docs)]

mod activity;
mod commands;
mod context;
mod error;
mod giveaway;
mod invites;
mod notice;
mod platform;

#[cfg(feature = "discord")]
mod discord;

pub use activity::MessageRewards;
pub use commands::{BotCommand, CommandParseError, START_GIVEAWAY_USAGE, parse_command};
pub use context::{BotContext, BotSettings, IncomingMessage};
pub use error::{SocialError, SocialErrorKind, SocialResult};
pub use giveaway::{
    GiveawayRequest, GiveawayService, GiveawayValidation, parse_duration, parse_duration_secs,
};
pub use invites::{Attribution, InviteCache, InviteSnapshot, InviteTracker, find_used_invite};
pub use notice::{Notice, NoticeColour, mention};
pub use platform::{ChatPlatform, direct_message_best_effort};

#[cfg(feature = "discord")]
pub use discord::{CashbotBot, CashbotHandler, SerenityPlatform};
