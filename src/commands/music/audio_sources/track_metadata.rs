//! Defines the `TrackMetadata` struct, the resolved and playable description of a track,
//! and the conversion from `yt-dlp` output.

use crate::commands::music::utils::music_manager::MusicError;
use serde::{Deserialize, Serialize};
use std::process::Output;
use std::time::Duration;

/// Unified representation of metadata for a playable track.
///
/// Immutable once resolved: the queue only ever clones it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// Locator handed verbatim to the voice transport to open the stream.
    pub source: String,
    /// The page the track was found on, if known.
    pub page_url: Option<String>,
    /// The duration of the track, if available.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The name of the user who requested the track.
    pub requested_by: Option<String>,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            page_url: None,
            duration: None,
            thumbnail: None,
            requested_by: None,
        }
    }

    /// Creates `TrackMetadata` from `yt-dlp` output, adding the requestor's name.
    pub fn from_youtube(output: Output, requested_by: String) -> Result<TrackMetadata, MusicError> {
        let mut metadata = Self::try_from(output)?;
        metadata.requested_by = Some(requested_by);
        Ok(metadata)
    }

    /// Parses the JSON printed by `yt-dlp -j`.
    ///
    /// One object is printed per line; search results and playlists contribute
    /// several, of which only the first is used.
    pub fn from_ytdlp_json(raw: &str) -> Result<TrackMetadata, MusicError> {
        let first_line = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| MusicError::ResolutionError("No results found".to_string()))?;

        let mut json: serde_json::Value = serde_json::from_str(first_line).map_err(|e| {
            MusicError::ResolutionError(format!("Failed to parse video metadata: {}", e))
        })?;

        // A flat playlist dump nests the actual videos under "entries".
        let nested = json
            .get_mut("entries")
            .and_then(|entries| entries.as_array_mut())
            .and_then(|entries| entries.first_mut())
            .map(serde_json::Value::take);
        if let Some(first) = nested {
            json = first;
        }

        let page_url = json["webpage_url"].as_str().map(str::to_string);
        let source = page_url
            .clone()
            .or_else(|| json["url"].as_str().map(str::to_string))
            .ok_or_else(|| {
                MusicError::ResolutionError("Result has no playable URL".to_string())
            })?;

        Ok(TrackMetadata {
            title: json["title"]
                .as_str()
                .unwrap_or("Unknown title")
                .to_string(),
            source,
            page_url,
            duration: json["duration"]
                .as_f64()
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
            thumbnail: json["thumbnail"].as_str().map(str::to_string),
            requested_by: None,
        })
    }

    /// Link used when displaying the track, `#` when no page is known.
    pub fn display_url(&self) -> &str {
        self.page_url.as_deref().unwrap_or("#")
    }
}

/// Converts the output of `yt-dlp -j` into `TrackMetadata`.
impl TryFrom<Output> for TrackMetadata {
    type Error = MusicError;

    fn try_from(value: Output) -> Result<Self, Self::Error> {
        if !value.status.success() {
            let stderr = String::from_utf8_lossy(&value.stderr);
            return Err(MusicError::ResolutionError(
                stderr
                    .lines()
                    .rev()
                    .find(|line| !line.trim().is_empty())
                    .unwrap_or("yt-dlp exited with an error")
                    .trim()
                    .to_string(),
            ));
        }

        Self::from_ytdlp_json(&String::from_utf8_lossy(&value.stdout))
    }
}
