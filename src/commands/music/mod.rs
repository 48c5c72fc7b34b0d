pub mod join;
pub mod leave;
pub mod pause;
pub mod play;
pub mod prev;
pub mod queue;
pub mod resume;
pub mod skip;

pub mod audio_sources;
pub mod utils;

pub use join::join;
pub use leave::leave;
pub use pause::pause;
pub use play::play;
pub use prev::prev;
pub use queue::queue;
pub use resume::resume;
pub use skip::skip;

use crate::{CommandResult, Context, Error};
use std::sync::Arc;
use utils::embedded_messages;
use utils::music_manager::{MusicError, MusicManager};
use utils::music_player::MusicPlayer;

/// The guild's player if it is connected to voice; otherwise replies and returns `None`.
async fn connected_player(ctx: Context<'_>) -> Result<Option<Arc<MusicPlayer>>, Error> {
    let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;

    if let Some(player) = ctx.data().players.get(guild_id) {
        if player.is_connected().await {
            return Ok(Some(player));
        }
    }

    ctx.send(embedded_messages::bot_not_in_voice_channel())
        .await?;
    Ok(None)
}
