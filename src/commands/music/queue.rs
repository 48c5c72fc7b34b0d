use super::*;

/// Show the current song queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    let Some(player) = ctx.data().players.get(guild_id) else {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    };

    let listing = player.queue_listing().await;

    ctx.send(embedded_messages::music_queue(
        &listing.rendered,
        listing.len,
        listing.total_duration,
    ))
    .await?;

    Ok(())
}
