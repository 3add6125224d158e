//! Alert destination configuration.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TelegramConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("TELEGRAM_CHAT_ID must be a numeric chat id, got {0:?}")]
    InvalidChatId(String),
}

/// Telegram bot credentials and target chat.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramConfig {
    /// Read `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env() -> Result<Self, TelegramConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TelegramConfigError> {
        let non_empty = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(TelegramConfigError::Missing(key))
        };
        let bot_token = non_empty("TELEGRAM_BOT_TOKEN")?;
        let chat_id = non_empty("TELEGRAM_CHAT_ID")?;
        if chat_id.parse::<i64>().is_err() {
            return Err(TelegramConfigError::InvalidChatId(chat_id));
        }
        Ok(Self { bot_token, chat_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = TelegramConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100200300"),
        ]))
        .unwrap();
        assert_eq!(config.chat_id, "-100200300");
        assert!(!format!("{:?}", config).contains("123:abc"));
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(
            TelegramConfig::from_lookup(lookup(&[("TELEGRAM_CHAT_ID", "1")])).unwrap_err(),
            TelegramConfigError::Missing("TELEGRAM_BOT_TOKEN")
        );
        assert_eq!(
            TelegramConfig::from_lookup(lookup(&[
                ("TELEGRAM_BOT_TOKEN", "t"),
                ("TELEGRAM_CHAT_ID", "  ")
            ]))
            .unwrap_err(),
            TelegramConfigError::Missing("TELEGRAM_CHAT_ID")
        );
    }

    #[test]
    fn test_invalid_chat_id() {
        assert!(matches!(
            TelegramConfig::from_lookup(lookup(&[
                ("TELEGRAM_BOT_TOKEN", "t"),
                ("TELEGRAM_CHAT_ID", "@channel")
            ])),
            Err(TelegramConfigError::InvalidChatId(_))
        ));
    }
}
