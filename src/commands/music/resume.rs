use super::*;

/// Resume a paused song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let Some(player) = connected_player(ctx).await? else {
        return Ok(());
    };

    let reply = if player.resume().await {
        embedded_messages::resumed()
    } else {
        embedded_messages::nothing_paused()
    };
    ctx.send(reply).await?;

    Ok(())
}
