//! Sample guilds, channels and tracks used across the suites

use rusty_jukebox::commands::music::audio_sources::track_metadata::TrackMetadata;
use serenity::model::id::{ChannelId, GuildId};
use std::time::Duration;

/// Sample guild ID for testing
pub const SAMPLE_GUILD_ID: u64 = 123456789;

/// A second guild, for isolation checks
pub const OTHER_GUILD_ID: u64 = 223456789;

/// Sample voice channel ID for testing
pub const SAMPLE_CHANNEL_ID: u64 = 987654321;

/// Another voice channel in the same guild
pub const OTHER_CHANNEL_ID: u64 = 987654322;

pub fn guild() -> GuildId {
    GuildId::new(SAMPLE_GUILD_ID)
}

pub fn other_guild() -> GuildId {
    GuildId::new(OTHER_GUILD_ID)
}

pub fn channel() -> ChannelId {
    ChannelId::new(SAMPLE_CHANNEL_ID)
}

pub fn other_channel() -> ChannelId {
    ChannelId::new(OTHER_CHANNEL_ID)
}

/// A resolved track whose source is derived from its title.
pub fn track(title: &str) -> TrackMetadata {
    let mut metadata = TrackMetadata::new(
        title,
        format!("https://www.youtube.com/watch?v={}", title.to_lowercase()),
    );
    metadata.duration = Some(Duration::from_secs(180));
    metadata.requested_by = Some("tester".to_string());
    metadata
}
