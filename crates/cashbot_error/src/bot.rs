//! Bot runtime error type.

/// Failure while running the bot (gateway connection, client startup).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Bot Error: {} at line {} in {}", message, line, file)]
pub struct BotError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BotError {
    /// Create a new BotError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
