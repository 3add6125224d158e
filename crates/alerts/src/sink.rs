//! Alert delivery transports.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Delivers a formatted message to a destination. No retry contract.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, destination: &str, message: &str) -> Result<(), AlertError>;
}

/// Sends HTML-formatted messages through the Telegram Bot API.
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(token: &str) -> Self {
        Self { bot: Bot::new(token) }
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn deliver(&self, destination: &str, message: &str) -> Result<(), AlertError> {
        let chat_id: i64 = destination
            .trim()
            .parse()
            .map_err(|_| AlertError::InvalidDestination(destination.to_string()))?;
        self.bot
            .send_message(ChatId(chat_id), message)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Writes alerts to the log instead of sending them. Used for dry runs.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    async fn deliver(&self, destination: &str, message: &str) -> Result<(), AlertError> {
        info!(destination = destination, "Alert (dry run):\n{}", message);
        Ok(())
    }
}
