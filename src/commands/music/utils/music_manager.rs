use poise::serenity_prelude as serenity;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use thiserror::Error;

/// Errors that can occur during music operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Failed to leave voice channel: {0}")]
    LeaveError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Error extracting information: {0}")]
    ResolutionError(String),

    #[error("Failed to start audio stream: {0}")]
    StreamError(String),

    #[error("This player has been shut down")]
    PlayerClosed,
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Voice-channel helpers that read from the serenity cache.
pub struct MusicManager;

impl MusicManager {
    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// Get the display name of a guild channel, falling back to its mention.
    pub fn channel_name(ctx: &Context, guild_id: GuildId, channel_id: ChannelId) -> String {
        ctx.cache
            .guild(guild_id)
            .and_then(|guild| guild.channels.get(&channel_id).map(|c| c.name.clone()))
            .unwrap_or_else(|| format!("<#{}>", channel_id))
    }
}
