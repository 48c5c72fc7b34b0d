//! Startup configuration read from the environment (and `.env`, via `dotenv`).

use std::env;
use thiserror::Error;
use tracing::debug;

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN not set. Please create a .env file or set the environment variable.")]
    MissingToken,
}

/// Settings the bot needs before it can log in.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub discord_token: String,
    pub command_prefix: String,
    pub ytdlp_path: String,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::MissingToken)?;
        let command_prefix = get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let ytdlp_path = get("YTDLP_PATH").unwrap_or_else(|| DEFAULT_YTDLP_PATH.to_string());

        debug!(
            "Loaded configuration (prefix '{}', yt-dlp at '{}')",
            command_prefix, ytdlp_path
        );

        Ok(Self {
            discord_token,
            command_prefix,
            ytdlp_path,
        })
    }
}
