use super::*;

/// Play the previous song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn prev(ctx: Context<'_>) -> CommandResult {
    let Some(player) = connected_player(ctx).await? else {
        return Ok(());
    };

    let reply = if player.previous().await {
        embedded_messages::playing_previous()
    } else {
        embedded_messages::no_previous_track()
    };
    ctx.send(reply).await?;

    Ok(())
}
