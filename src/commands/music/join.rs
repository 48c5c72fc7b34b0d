use super::*;

/// Make the bot join your voice channel
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

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

    let mut result = Err(MusicError::PlayerClosed);
    for _ in 0..2 {
        let player = ctx.data().players.get_or_create(guild_id);
        result = player.connect(channel_id).await;
        if !matches!(result, Err(MusicError::PlayerClosed)) {
            break;
        }
    }

    if let Err(err) = result {
        tracing::error!("Failed to join {} in guild {}: {}", channel_id, guild_id, err);
        ctx.send(embedded_messages::failed_to_join_voice_channel(err))
            .await?;
        return Ok(());
    }

    let channel_name = MusicManager::channel_name(ctx.serenity_context(), guild_id, channel_id);
    ctx.send(embedded_messages::joined_voice_channel(&channel_name))
        .await?;

    Ok(())
}
