use super::*;

/// Disconnect from the voice channel and clear the queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let Some(player) = connected_player(ctx).await? else {
        return Ok(());
    };

    // Closed before it is unregistered, so a concurrent play either lands
    // before the close or gets a fresh player
    player.close().await;
    ctx.data().players.remove(&player);

    ctx.send(embedded_messages::left_voice_channel()).await?;

    Ok(())
}
