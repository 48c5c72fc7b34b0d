//! This module defines the structure and traits for resolving user queries into playable tracks.
//! Resolution happens before anything touches a guild's player, so slow lookups never hold
//! the player lock.

/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing the `AudioApi` trait on top of `yt-dlp`.
pub mod youtube;

use crate::commands::music::utils::music_manager::MusicError;
use serenity::async_trait;
use track_metadata::TrackMetadata;
use url::Url;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// Common interface for media resolvers.
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Resolves a URL or free-text search into a single playable track.
    ///
    /// # Arguments
    ///
    /// * `query` - A direct URL or search terms.
    /// * `requestor_name` - The name of the user who requested the track.
    async fn resolve(&self, query: &str, requestor_name: String)
    -> AudioSourceResult<TrackMetadata>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Whether the input is an `http`/`https` URL rather than search terms.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input.trim())
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}
