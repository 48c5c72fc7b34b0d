use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;
use std::time::Duration;

use super::{format_duration, music_manager::MusicError, music_player::AddOutcome};
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

const SUCCESS_COLOR: u32 = 0x00ff00;
const ERROR_COLOR: u32 = 0xff0000;

/// Parse the metadata for the now playing and added to queue embeds
fn parse_metadata(metadata: &TrackMetadata) -> (String, String, String) {
    let title = metadata.title.clone();
    let url = metadata.display_url().to_string();
    let duration_str = metadata
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown duration".to_string());

    (title, url, duration_str)
}

fn info(title: &str, description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(title)
            .description(description)
            .color(SUCCESS_COLOR),
    )
}

fn error(description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("❌ Error")
            .description(description)
            .color(ERROR_COLOR),
    )
}

/// Create an embed for a track that was queued, or started because the player was idle
pub fn track_queued(metadata: &TrackMetadata, outcome: AddOutcome) -> CreateReply {
    let (title, url, duration_str) = parse_metadata(metadata);

    let heading = if outcome.started {
        "🎵 Now Playing"
    } else {
        "🎵 Added to Queue"
    };

    let mut embed = CreateEmbed::new()
        .title(heading)
        .description(format!("[{}]({})", title, url))
        .field("Duration", format!("`{}`", duration_str), true)
        .field("Position", format!("`#{}`", outcome.position), true)
        .color(SUCCESS_COLOR);

    if let Some(thumbnail) = &metadata.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    if let Some(requested_by) = &metadata.requested_by {
        embed = embed.field("Requested by", requested_by, true);
    }

    CreateReply::default().embed(embed)
}

// Leaves room for the code fence inside Discord's 4096 character description limit
const MAX_LISTING_CHARS: usize = 4000;

fn fit_listing(rendered: &str) -> String {
    if rendered.chars().count() <= MAX_LISTING_CHARS {
        return rendered.to_string();
    }

    let lines: Vec<&str> = rendered.lines().collect();
    let mut kept = String::new();
    let mut used = 0;
    for (i, line) in lines.iter().enumerate() {
        let remaining = lines.len() - i;
        let footer = format!("... and {} more", remaining);
        if used + line.chars().count() + 1 + footer.len() > MAX_LISTING_CHARS {
            kept.push_str(&footer);
            return kept;
        }
        kept.push_str(line);
        kept.push('\n');
        used += line.chars().count() + 1;
    }
    kept
}

/// Create an embed for the music queue
pub fn music_queue(rendered: &str, tracks: usize, total_duration: Duration) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("🎵 Music Queue")
        .description(format!("```\n{}\n```", fit_listing(rendered)))
        .color(SUCCESS_COLOR);

    if tracks > 0 {
        let summary = if total_duration.as_secs() > 0 {
            format!(
                "`{} tracks` • Total Length: `{}`",
                tracks,
                format_duration(total_duration)
            )
        } else {
            format!("`{} tracks`", tracks)
        };
        embed = embed.field("Queue Info", summary, false);
    }

    CreateReply::default().embed(embed)
}

pub fn queue_is_empty() -> CreateReply {
    info("🎵 Music Queue", "The queue is empty.")
}

pub fn joined_voice_channel(channel_name: &str) -> CreateReply {
    info("🔊 Joined", format!("Joined {}.", channel_name))
}

/// Create an embed for when the bot leaves a voice channel
pub fn left_voice_channel() -> CreateReply {
    info("👋 Left Voice Channel", "Disconnected and cleared the queue.")
}

/// Create an embed for when the bot is not connected to a voice channel
pub fn bot_not_in_voice_channel() -> CreateReply {
    error("I am not connected to any voice channel.")
}

/// Create an embed for when a user is not connected to a voice channel
pub fn user_not_in_voice_channel(err: MusicError) -> CreateReply {
    error(format!("You need to be in a voice channel: {}", err)).ephemeral(true)
}

/// Create an embed for when the bot fails to join a voice channel
pub fn failed_to_join_voice_channel(err: MusicError) -> CreateReply {
    error(err.to_string())
}

/// Create an embed for when a query could not be resolved to a track
pub fn failed_to_resolve(err: MusicError) -> CreateReply {
    error(err.to_string())
}

pub fn failed_to_add_to_queue(err: MusicError) -> CreateReply {
    error(format!("Failed to add track to queue: {}", err))
}

pub fn paused() -> CreateReply {
    info("⏸️ Paused", "Paused.")
}

pub fn resumed() -> CreateReply {
    info("▶️ Resumed", "Resumed.")
}

pub fn nothing_playing() -> CreateReply {
    error("Nothing is playing.")
}

pub fn nothing_paused() -> CreateReply {
    error("Nothing is paused.")
}

pub fn skipped() -> CreateReply {
    info("⏭️ Skipped", "Skipped.")
}

pub fn no_track_to_skip() -> CreateReply {
    error("No more songs in the queue.")
}

pub fn playing_previous() -> CreateReply {
    info("⏮️ Previous", "Playing previous song...")
}

pub fn no_previous_track() -> CreateReply {
    error("There is no previous song to play.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> TrackMetadata {
        let mut metadata = TrackMetadata::new("Song", "https://www.youtube.com/watch?v=song");
        metadata.duration = Some(Duration::from_secs(225));
        metadata.requested_by = Some("tester".to_string());
        metadata
    }

    #[test]
    fn test_track_queued_fields() {
        let reply = track_queued(
            &sample_track(),
            AddOutcome {
                position: 2,
                started: false,
            },
        );
        let embed = serde_json::to_value(&reply.embeds[0]).unwrap();

        assert_eq!(embed["title"], "🎵 Added to Queue");
        assert_eq!(embed["fields"][0]["value"], "`3:45`");
        assert_eq!(embed["fields"][1]["value"], "`#2`");
        assert_eq!(embed["fields"][2]["value"], "tester");
    }

    #[test]
    fn test_track_started_heading() {
        let reply = track_queued(
            &sample_track(),
            AddOutcome {
                position: 1,
                started: true,
            },
        );
        let embed = serde_json::to_value(&reply.embeds[0]).unwrap();

        assert_eq!(embed["title"], "🎵 Now Playing");
    }

    #[test]
    fn test_short_listing_untouched() {
        assert_eq!(fit_listing("-> 1. A\n   2. B"), "-> 1. A\n   2. B");
    }

    #[test]
    fn test_long_listing_truncated() {
        let rendered = (1..=500)
            .map(|i| format!("   {}. Some fairly long track title", i))
            .collect::<Vec<_>>()
            .join("\n");
        let fitted = fit_listing(&rendered);

        assert!(fitted.chars().count() <= MAX_LISTING_CHARS);
        assert!(fitted.starts_with("   1. Some"));
        assert!(fitted.ends_with("more"));
    }
}
