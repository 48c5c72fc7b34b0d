use super::*;

/// Pause the current song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let Some(player) = connected_player(ctx).await? else {
        return Ok(());
    };

    let reply = if player.pause().await {
        embedded_messages::paused()
    } else {
        embedded_messages::nothing_playing()
    };
    ctx.send(reply).await?;

    Ok(())
}
