//! User-facing notices.
//!
//! A notice is a titled, coloured message. Platform adapters decide how it is
//! rendered; Discord turns it into an embed.

use cashbot_database::LeaderboardCategory;

/// Accent colour of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeColour {
    /// Confirmation and good news.
    Success,
    /// Rejections and problems.
    Failure,
    /// Neutral announcements.
    Info,
    /// Balance reports.
    Highlight,
}

impl NoticeColour {
    /// RGB value of the colour.
    pub fn rgb(self) -> u32 {
        match self {
            NoticeColour::Success => 0x2ECC71,
            NoticeColour::Failure => 0xE74C3C,
            NoticeColour::Info => 0x3498DB,
            NoticeColour::Highlight => 0xF1C40F,
        }
    }
}

/// A titled, coloured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Heading
    pub title: String,
    /// Body text (markdown)
    pub description: String,
    /// Accent colour
    pub colour: NoticeColour,
}

/// Mention markup for a user id.
pub fn mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

impl Notice {
    /// Create a notice.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        colour: NoticeColour,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            colour,
        }
    }

    /// Public greeting for a member whose invite was attributed.
    pub fn welcome(member_id: u64, inviter_id: u64) -> Self {
        Self::new(
            "Welcome!",
            format!(
                "Welcome to the server, {}! Invited by {}.",
                mention(member_id),
                mention(inviter_id)
            ),
            NoticeColour::Success,
        )
    }

    /// Private congratulation to an inviter.
    pub fn invite_success(member_id: u64, coins: i64) -> Self {
        Self::new(
            "Invite Success!",
            format!(
                "You invited {} and earned {} coins!",
                mention(member_id),
                coins
            ),
            NoticeColour::Success,
        )
    }

    /// Rejection of a malformed giveaway duration.
    pub fn invalid_duration() -> Self {
        Self::new(
            "Invalid Time Format",
            "Please use the format like `30s`, `2m`, `4h`, `3d`.",
            NoticeColour::Failure,
        )
    }

    /// Rejection of a winner count below one.
    pub fn invalid_winner_count() -> Self {
        Self::new(
            "Invalid Winner Count",
            "There must be at least 1 winner.",
            NoticeColour::Failure,
        )
    }

    /// Announcement of a new giveaway.
    pub fn giveaway_started(prize: &str, duration: &str, num_winners: u32, prefix: &str) -> Self {
        Self::new(
            "🎉 Giveaway Started",
            format!(
                "A giveaway for **{}** has started!\nDuration: {}\nWinners: {}\nType `{}enter_giveaway` to join!",
                prize, duration, num_winners, prefix
            ),
            NoticeColour::Info,
        )
    }

    /// Announcement of the drawn winners.
    pub fn giveaway_ended(prize: &str, winners: &[u64]) -> Self {
        let mentions = winners
            .iter()
            .map(|w| mention(*w))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            "🎉 Giveaway Ended",
            format!(
                "The giveaway for **{}** has ended!\nWinners: {}",
                prize, mentions
            ),
            NoticeColour::Success,
        )
    }

    /// Announcement that a giveaway could not be filled.
    pub fn not_enough_participants() -> Self {
        Self::new(
            "Not Enough Participants",
            "There are not enough participants for the number of winners.",
            NoticeColour::Failure,
        )
    }

    /// Rejection of an entry the user cannot afford.
    pub fn not_enough_coins(user_id: u64, cost: i64) -> Self {
        Self::new(
            "Not Enough Coins",
            format!(
                "{}, you need {} coins to enter the giveaway.",
                mention(user_id),
                cost
            ),
            NoticeColour::Failure,
        )
    }

    /// Rejection of a duplicate entry.
    pub fn already_entered(user_id: u64) -> Self {
        Self::new(
            "Already Entered",
            format!("{}, you are already in the giveaway.", mention(user_id)),
            NoticeColour::Failure,
        )
    }

    /// Rejection of an entry while no giveaway runs.
    pub fn no_active_giveaway(user_id: u64) -> Self {
        Self::new(
            "No Active Giveaway",
            format!(
                "{}, there is no giveaway running right now.",
                mention(user_id)
            ),
            NoticeColour::Failure,
        )
    }

    /// Confirmation of an entry.
    pub fn entry_confirmed(user_id: u64) -> Self {
        Self::new(
            "Giveaway Entry Confirmed",
            format!("{} has entered the giveaway!", mention(user_id)),
            NoticeColour::Success,
        )
    }

    /// Balance report.
    pub fn balance(user_id: u64, coins: i64, xp: i64) -> Self {
        Self::new(
            "Balance",
            format!(
                "{}, you have {} coins and {} XP.",
                mention(user_id),
                coins,
                xp
            ),
            NoticeColour::Highlight,
        )
    }

    /// Reply to a user without a ledger record.
    pub fn not_in_system(user_id: u64) -> Self {
        Self::new(
            "Not in System",
            format!("{}, you are not in the system yet.", mention(user_id)),
            NoticeColour::Failure,
        )
    }

    /// Rejection of an unknown leaderboard category.
    pub fn invalid_category() -> Self {
        Self::new(
            "Invalid Category",
            "Invalid category! Use `coins` or `xp`.",
            NoticeColour::Failure,
        )
    }

    /// Reply to a leaderboard request on an empty ledger.
    pub fn no_data(category: LeaderboardCategory) -> Self {
        Self::new(
            "No Data Found",
            format!("No data found for {}.", category),
            NoticeColour::Failure,
        )
    }

    /// Ranked leaderboard; `rows` pairs display names with values.
    pub fn leaderboard(category: LeaderboardCategory, limit: i64, rows: &[(String, i64)]) -> Self {
        let body: String = rows
            .iter()
            .enumerate()
            .map(|(i, (name, value))| format!("{}. {} - {} {}\n", i + 1, name, value, category))
            .collect();
        Self::new(
            format!("Top {} users by {}", limit, category),
            body,
            NoticeColour::Info,
        )
    }

    /// Usage hint for a malformed command.
    pub fn usage(usage: &str) -> Self {
        Self::new(
            "Invalid Command",
            format!("Usage: `{}`", usage),
            NoticeColour::Failure,
        )
    }
}
