//! Error types for cashbot.
//!
//! This crate provides the foundation error types used throughout the cashbot workspace.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use cashbot_error::{CashbotResult, ConfigError};
//!
//! fn load_prefix() -> CashbotResult<String> {
//!     Err(ConfigError::new("command prefix must not be empty"))?
//! }
//!
//! assert!(load_prefix().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bot;
mod config;
mod database;
mod error;

pub use bot::BotError;
pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{CashbotError, CashbotErrorKind, CashbotResult};
