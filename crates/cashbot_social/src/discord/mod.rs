//! Discord integration for cashbot.
//!
//! # Architecture
//!
//! - **platform**: [`ChatPlatform`](crate::ChatPlatform) over Serenity's HTTP client
//! - **handler**: Event handler implementing Serenity's EventHandler trait
//! - **client**: Serenity client setup and lifecycle management
//!
//! Available with the `discord` feature.

mod client;
mod handler;
mod platform;

pub use client::CashbotBot;
pub use handler::CashbotHandler;
pub use platform::SerenityPlatform;
