use std::env;

use anyhow::Context as _;

use warden_utils::lang::Lang;

/// Deployment-time constants for the single server the bot moderates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BotConfig {
    pub guild_id: u64,
    /// Channels where open commands (ping, hello, level, warns) are answered.
    pub allowed_channels: Vec<u64>,
    pub help_channel: Option<u64>,
    pub moderation_channels: Vec<u64>,
    pub verification_channel: Option<u64>,
    pub welcome_channel: Option<u64>,
    /// Language for notices not triggered by a text message (reactions, joins).
    pub default_lang: Lang,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let guild_id = env::var("DISCORD_GUILD_ID")
            .context("DISCORD_GUILD_ID is not set")?
            .trim()
            .parse::<u64>()
            .context("DISCORD_GUILD_ID is not a valid id")?;
        anyhow::ensure!(guild_id != 0, "DISCORD_GUILD_ID must not be zero");

        Ok(Self {
            guild_id,
            allowed_channels: env_id_list("ALLOWED_CHANNEL_IDS")?,
            help_channel: env_id("HELP_CHANNEL_ID")?,
            moderation_channels: env_id_list("MODERATION_CHANNEL_IDS")?,
            verification_channel: env_id("VERIFICATION_CHANNEL_ID")?,
            welcome_channel: env_id("WELCOME_CHANNEL_ID")?,
            default_lang: env::var("BOT_LANGUAGE")
                .ok()
                .and_then(|code| Lang::from_code(&code))
                .unwrap_or_default(),
        })
    }

    pub fn is_help_channel(&self, channel_id: u64) -> bool {
        self.help_channel == Some(channel_id)
    }

    pub fn is_moderation_channel(&self, channel_id: u64) -> bool {
        self.moderation_channels.contains(&channel_id)
    }

    /// Open commands are answered in every channel the bot is configured for.
    pub fn is_open_channel(&self, channel_id: u64) -> bool {
        self.allowed_channels.contains(&channel_id)
            || self.is_help_channel(channel_id)
            || self.is_moderation_channel(channel_id)
    }
}

fn env_id(key: &str) -> anyhow::Result<Option<u64>> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{key} is not a valid id")),
        _ => Ok(None),
    }
}

fn env_id_list(key: &str) -> anyhow::Result<Vec<u64>> {
    match env::var(key) {
        Ok(value) => parse_id_list(&value).with_context(|| format!("{key} contains an invalid id")),
        Err(_) => Ok(Vec::new()),
    }
}

/// Parse a comma or whitespace separated list of snowflake ids.
pub fn parse_id_list(raw: &str) -> anyhow::Result<Vec<u64>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("`{part}` is not a valid id"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BotConfig, parse_id_list};

    #[test]
    fn parses_id_lists() {
        assert_eq!(
            parse_id_list("1424338677869314078, 1424337548439982203").unwrap(),
            vec![1424338677869314078, 1424337548439982203]
        );
        assert_eq!(parse_id_list("  ").unwrap(), Vec::<u64>::new());
        assert!(parse_id_list("12,abc").is_err());
    }

    #[test]
    fn channel_scopes() {
        let config = BotConfig {
            allowed_channels: vec![1],
            help_channel: Some(2),
            moderation_channels: vec![3],
            ..BotConfig::default()
        };

        assert!(config.is_open_channel(1));
        assert!(config.is_open_channel(2));
        assert!(config.is_open_channel(3));
        assert!(!config.is_open_channel(4));
        assert!(config.is_help_channel(2));
        assert!(!config.is_help_channel(1));
        assert!(config.is_moderation_channel(3));
        assert!(!config.is_moderation_channel(1));
    }
}
