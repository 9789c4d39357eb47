//! Text command parsing.
//!
//! Commands are `<prefix><name> <args>`. Names are matched exactly; anything
//! that does not name a known command is not a command at all.

/// A recognised bot command with its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `start_giveaway <duration> <num_winners> <prize...>`
    StartGiveaway {
        /// Duration text, validated when the giveaway starts
        duration: String,
        /// Requested winner count, validated when the giveaway starts
        num_winners: i64,
        /// Rest of the message
        prize: String,
    },
    /// `enter_giveaway`
    EnterGiveaway,
    /// `balance`
    Balance,
    /// `leaderboard [category]`
    Leaderboard {
        /// Category text, if one was given
        category: Option<String>,
    },
}

/// Usage line of `start_giveaway`, without the prefix.
pub const START_GIVEAWAY_USAGE: &str = "start_giveaway <duration> <num_winners> <prize>";

/// Why a known command could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Error)]
pub enum CommandParseError {
    /// A required argument is absent.
    #[display("Missing required argument '{}' for command '{}'", arg_name, command)]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Argument name
        arg_name: &'static str,
    },

    /// An argument has the wrong shape.
    #[display("Invalid argument '{}' for command '{}': {}", arg_name, command, value)]
    InvalidArgument {
        /// Command name
        command: &'static str,
        /// Argument name
        arg_name: &'static str,
        /// Offending text
        value: String,
    },
}

impl CommandParseError {
    /// Usage line of the command that failed, with `prefix` prepended.
    pub fn usage(&self, prefix: &str) -> String {
        let usage = match self {
            CommandParseError::MissingArgument { command, .. }
            | CommandParseError::InvalidArgument { command, .. } => match *command {
                "start_giveaway" => START_GIVEAWAY_USAGE,
                other => other,
            },
        };
        format!("{}{}", prefix, usage)
    }
}

/// Split the first whitespace-delimited word off `input`.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(end) => Some((&input[..end], &input[end..])),
        None => Some((input, "")),
    }
}

/// Parse a message as a command.
///
/// Returns `None` when the message does not start with `prefix` or names no
/// known command; such messages are ignored. A known command with missing
/// or malformed arguments yields an error carrying its usage.
///
/// # Example
/// ```
/// use cashbot_social::{BotCommand, parse_command};
///
/// let parsed = parse_command("!", "!leaderboard xp");
/// assert_eq!(
///     parsed,
///     Some(Ok(BotCommand::Leaderboard { category: Some("xp".to_string()) }))
/// );
/// assert_eq!(parse_command("!", "hello there"), None);
/// ```
pub fn parse_command(prefix: &str, content: &str) -> Option<Result<BotCommand, CommandParseError>> {
    let body = content.strip_prefix(prefix)?;
    // The command name must follow the prefix directly.
    if body.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, args) = next_word(body)?;

    let command = match name {
        "start_giveaway" => parse_start_giveaway(args),
        "enter_giveaway" => Ok(BotCommand::EnterGiveaway),
        "balance" => Ok(BotCommand::Balance),
        "leaderboard" => Ok(BotCommand::Leaderboard {
            category: next_word(args).map(|(word, _)| word.to_string()),
        }),
        _ => return None,
    };
    Some(command)
}

fn parse_start_giveaway(args: &str) -> Result<BotCommand, CommandParseError> {
    const COMMAND: &str = "start_giveaway";
    let missing = |arg_name| CommandParseError::MissingArgument {
        command: COMMAND,
        arg_name,
    };

    let (duration, rest) = next_word(args).ok_or_else(|| missing("duration"))?;
    let (winners, rest) = next_word(rest).ok_or_else(|| missing("num_winners"))?;
    let num_winners = winners
        .parse::<i64>()
        .map_err(|_| CommandParseError::InvalidArgument {
            command: COMMAND,
            arg_name: "num_winners",
            value: winners.to_string(),
        })?;
    let prize = rest.trim();
    if prize.is_empty() {
        return Err(missing("prize"));
    }

    Ok(BotCommand::StartGiveaway {
        duration: duration.to_string(),
        num_winners,
        prize: prize.to_string(),
    })
}
