//! Top-level error wrapper types.

use crate::{BotError, ConfigError, DatabaseError};

/// Every failure a cashbot crate can surface to the binary.
///
/// # Examples
///
/// ```
/// use cashbot_error::{CashbotError, ConfigError};
///
/// let err: CashbotError = ConfigError::new("bad prefix").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CashbotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Bot runtime error
    #[from(BotError)]
    Bot(BotError),
}

/// Cashbot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Cashbot Error: {}", _0)]
pub struct CashbotError(Box<CashbotErrorKind>);

impl CashbotError {
    /// Create a new error from a kind.
    pub fn new(kind: CashbotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CashbotErrorKind {
        &self.0
    }
}

impl<T> From<T> for CashbotError
where
    T: Into<CashbotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for cashbot operations.
pub type CashbotResult<T> = std::result::Result<T, CashbotError>;
