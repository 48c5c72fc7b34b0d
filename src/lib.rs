//! A Discord music bot: per-guild track queues played into voice channels through songbird.

pub mod commands;
pub mod utils;

use std::sync::{Arc, LazyLock};

use commands::music::audio_sources::youtube::YoutubeApi;
use commands::music::utils::player_registry::PlayerRegistry;
use commands::music::utils::voice_transport::VoiceTransport;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client handed to songbird inputs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

// User data, which is stored and accessible in all command invocations
pub struct Data {
    /// One music player per guild, created on first use.
    pub players: PlayerRegistry,
    /// Resolves play queries into playable tracks.
    pub resolver: YoutubeApi,
}

impl Data {
    pub fn new(transport: Arc<dyn VoiceTransport>, resolver: YoutubeApi) -> Self {
        Self {
            players: PlayerRegistry::new(transport),
            resolver,
        }
    }
}
