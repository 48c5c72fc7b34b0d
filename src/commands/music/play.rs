use super::*;
use crate::commands::music::audio_sources::AudioApi;
use tracing::{error, info};

/// Play a song by URL or search term
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    // Get the user's voice channel
    let channel_id = match MusicManager::get_user_voice_channel(
        ctx.serenity_context(),
        guild_id,
        ctx.author().id,
    ) {
        Ok(channel_id) => channel_id,
        Err(err) => {
            ctx.send(embedded_messages::user_not_in_voice_channel(err))
                .await?;
            return Ok(());
        }
    };

    // Defer the response since resolving the query might take time
    ctx.defer().await?;

    // Resolve before touching the player so a slow lookup never holds its lock
    let metadata = match ctx
        .data()
        .resolver
        .resolve(&query, ctx.author().name.clone())
        .await
    {
        Ok(metadata) => metadata,
        Err(err) => {
            error!("Failed to resolve '{}': {}", query, err);
            ctx.send(embedded_messages::failed_to_resolve(err)).await?;
            return Ok(());
        }
    };

    // Joining and queueing happen under one lock so the queue cannot drain and
    // disconnect in between. A player closed by a concurrent leave is replaced once.
    let mut result = Err(MusicError::PlayerClosed);
    for _ in 0..2 {
        let player = ctx.data().players.get_or_create(guild_id);
        result = player.connect_and_add(channel_id, metadata.clone()).await;
        if !matches!(result, Err(MusicError::PlayerClosed)) {
            break;
        }
    }

    match result {
        Ok(outcome) => {
            ctx.send(embedded_messages::track_queued(&metadata, outcome))
                .await?;
        }
        Err(err @ MusicError::JoinError(_)) => {
            error!("Failed to join {} in guild {}: {}", channel_id, guild_id, err);
            ctx.send(embedded_messages::failed_to_join_voice_channel(err))
                .await?;
        }
        Err(err) => {
            error!("Failed to queue '{}' in guild {}: {}", metadata.title, guild_id, err);
            ctx.send(embedded_messages::failed_to_add_to_queue(err))
                .await?;
        }
    }

    Ok(())
}
