//! Error types for bot operations.
//!
//! Validation problems (bad duration, missing coins) are not errors; they are
//! reported back to the user as notices. These types cover persistence and
//! platform failures that abort an operation.

use cashbot_error::DatabaseError;
use derive_getters::Getters;

/// Social error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum SocialErrorKind {
    /// Database operation failed.
    #[display("Database error: {_0}")]
    Database(String),

    /// Platform API error (HTTP error, gateway error, rate limit).
    #[display("Platform error: {_0}")]
    Platform(String),

    /// The recipient does not accept direct messages from the bot.
    #[display("Recipient unreachable: {_0}")]
    RecipientUnreachable(u64),

    /// Connection to the platform gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Configuration error (missing token, invalid settings).
    #[display("Configuration error: {_0}")]
    Configuration(String),
}

/// Social error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Social Error: {} at line {} in {}", kind, line, file)]
pub struct SocialError {
    kind: SocialErrorKind,
    line: u32,
    file: &'static str,
}

impl SocialError {
    /// Create a new SocialError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use cashbot_social::{SocialError, SocialErrorKind};
    ///
    /// let err = SocialError::new(SocialErrorKind::RecipientUnreachable(42));
    /// assert!(err.is_recipient_unreachable());
    /// ```
    #[track_caller]
    pub fn new(kind: SocialErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether a direct message bounced because the recipient blocks the bot.
    pub fn is_recipient_unreachable(&self) -> bool {
        matches!(self.kind, SocialErrorKind::RecipientUnreachable(_))
    }
}

/// Result type for bot operations.
pub type SocialResult<T> = Result<T, SocialError>;

impl From<DatabaseError> for SocialError {
    #[track_caller]
    fn from(err: DatabaseError) -> Self {
        SocialError::new(SocialErrorKind::Database(err.to_string()))
    }
}

#[cfg(feature = "discord")]
impl From<serenity::Error> for SocialError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        SocialError::new(SocialErrorKind::Platform(err.to_string()))
    }
}
