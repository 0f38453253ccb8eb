use crate::error::BotError;

const CHANNEL_ENV: &str = "FILINGS_BOT_CHANNEL";

/// Runtime configuration for the message handler.
///
/// Only events from `channel` are answered; everything else is ignored.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub channel: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, BotError> {
        let channel = std::env::var(CHANNEL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BotError::Config(format!("{CHANNEL_ENV} is not set")))?;
        Ok(Self { channel })
    }
}
