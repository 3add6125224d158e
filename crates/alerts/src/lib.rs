//! Telegram alerts for price divergence opportunities.
//!
//! This crate provides:
//! - Message formatting for opportunities
//! - The `AlertSink` transport trait with Telegram and log-only sinks
//! - A notifier enforcing a global cooldown between dispatches

pub mod config;
pub mod format;
pub mod notifier;
pub mod sink;

pub use config::{TelegramConfig, TelegramConfigError};
pub use format::format_opportunity_message;
pub use notifier::{NotificationState, Notifier, NotifierConfig, NotifyOutcome};
pub use sink::{AlertError, AlertSink, LogSink, TelegramSink};
