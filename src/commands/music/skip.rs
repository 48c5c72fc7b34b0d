use super::*;

/// Skip to the next song in the queue
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let Some(player) = connected_player(ctx).await? else {
        return Ok(());
    };

    let reply = if player.skip().await {
        embedded_messages::skipped()
    } else {
        embedded_messages::no_track_to_skip()
    };
    ctx.send(reply).await?;

    Ok(())
}
