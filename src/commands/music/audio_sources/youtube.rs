//! Implements the `AudioApi` trait using the `yt-dlp` command-line tool.

use super::{AudioApi, AudioSource, AudioSourceResult, TrackMetadata};
use crate::commands::music::utils::music_manager::MusicError;
use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Resolver backed by a `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YoutubeApi {
    ytdlp_path: String,
}

impl Default for YoutubeApi {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YoutubeApi {
    pub fn new(ytdlp_path: impl Into<String>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    /// Argument passed to `yt-dlp`: URLs as-is, anything else as a YouTube search.
    pub fn query_argument(query: &str) -> String {
        let query = query.trim();
        if AudioSource::is_url(query) {
            query.to_string()
        } else {
            format!("ytsearch:{}", query)
        }
    }
}

#[async_trait]
impl AudioApi for YoutubeApi {
    async fn resolve(
        &self,
        query: &str,
        requestor_name: String,
    ) -> AudioSourceResult<TrackMetadata> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MusicError::ResolutionError(
                "Nothing to search for".to_string(),
            ));
        }

        let argument = Self::query_argument(query);
        info!("Resolving '{}' with {}", argument, self.ytdlp_path);

        let output = Command::new(&self.ytdlp_path)
            .args([
                "-j",            // Output as JSON
                "--no-playlist", // Don't process playlists
                "--no-warnings",
                "-f",
                "bestaudio/best",
                &argument,
            ])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                MusicError::ResolutionError(format!("Failed to run {}: {}", self.ytdlp_path, e))
            })?;

        let metadata = TrackMetadata::from_youtube(output, requestor_name)?;
        debug!("Resolved '{}' to '{}'", query, metadata.title);

        Ok(metadata)
    }
}
