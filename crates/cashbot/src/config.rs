//! Layered configuration for the cashbot binary.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`cashbot.toml` shipped with the binary)
//! 2. User config in the home directory (`~/.config/cashbot/cashbot.toml`)
//! 3. `./cashbot.toml`, or the file given with `--config`
//! 4. Environment variables prefixed `CASHBOT_`, nested with `__`
//!    (e.g. `CASHBOT_REWARDS__INVITE_COINS=75`)

use cashbot_database::Database;
use cashbot_error::{CashbotResult, ConfigError};
use cashbot_social::BotSettings;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../cashbot.toml");

/// `[bot]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BotSection {
    /// Prefix that marks a message as a command
    pub command_prefix: String,
    /// Channel new members are welcomed in
    pub welcome_channel: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            welcome_channel: "general".to_string(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file path
    pub path: String,
    /// How long a connection waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "cashbot.db".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

/// `[rewards]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewardsSection {
    /// Experience per message
    pub message_xp: i64,
    /// Coins per message
    pub message_coins: i64,
    /// Coins per attributed invite
    pub invite_coins: i64,
}

impl Default for RewardsSection {
    fn default() -> Self {
        Self {
            message_xp: 10,
            message_coins: 5,
            invite_coins: 50,
        }
    }
}

/// `[giveaway]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GiveawaySection {
    /// Coins debited per entry
    pub entry_cost: i64,
}

impl Default for GiveawaySection {
    fn default() -> Self {
        Self { entry_cost: 100 }
    }
}

/// `[leaderboard]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeaderboardSection {
    /// Rows shown
    pub limit: i64,
}

impl Default for LeaderboardSection {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of text
    pub json_logs: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Complete cashbot configuration.
///
/// # Example
///
/// ```no_run
/// use cashbot::CashbotConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CashbotConfig::load(None)?;
/// println!("Entry cost: {}", config.giveaway.entry_cost);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CashbotConfig {
    /// Command and channel settings
    pub bot: BotSection,
    /// Storage settings
    pub database: DatabaseSection,
    /// Activity and invite rewards
    pub rewards: RewardsSection,
    /// Giveaway settings
    pub giveaway: GiveawaySection,
    /// Leaderboard settings
    pub leaderboard: LeaderboardSection,
    /// Log output settings
    pub logging: LoggingSection,
}

impl CashbotConfig {
    /// Load configuration from every layer.
    ///
    /// With `path`, that file replaces `./cashbot.toml` and must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// merged values fail validation.
    #[instrument(skip(path), fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> CashbotResult<Self> {
        debug!("Loading configuration with precedence: env > file > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/cashbot/cashbot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("cashbot").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("CASHBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Parse a TOML document layered over the bundled defaults.
    ///
    /// No files or environment variables are consulted.
    pub fn from_toml_str(toml: &str) -> CashbotResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CashbotResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the bot misbehave.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.bot.command_prefix;
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::new(format!(
                "bot.command_prefix must be non-empty without whitespace, got {:?}",
                prefix
            )));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::new("database.path must not be empty"));
        }
        if self.giveaway.entry_cost < 0 {
            return Err(ConfigError::new(format!(
                "giveaway.entry_cost must not be negative, got {}",
                self.giveaway.entry_cost
            )));
        }
        if self.leaderboard.limit < 1 {
            return Err(ConfigError::new(format!(
                "leaderboard.limit must be at least 1, got {}",
                self.leaderboard.limit
            )));
        }
        Ok(())
    }

    /// Bot behaviour derived from this configuration.
    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            command_prefix: self.bot.command_prefix.clone(),
            welcome_channel: self.bot.welcome_channel.clone(),
            message_xp: self.rewards.message_xp,
            message_coins: self.rewards.message_coins,
            invite_coins: self.rewards.invite_coins,
            entry_cost: self.giveaway.entry_cost,
            leaderboard_limit: self.leaderboard.limit,
        }
    }

    /// Database handle for the configured file.
    pub fn database(&self) -> Database {
        Database::new(self.database.path.clone()).with_busy_timeout(self.database.busy_timeout_ms)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> CashbotResult<String> {
        Ok(toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render configuration: {}", e)))?)
    }
}
