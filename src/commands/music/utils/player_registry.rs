use super::music_player::MusicPlayer;
use super::voice_transport::VoiceTransport;
use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::info;

/// Owns the live [`MusicPlayer`] of every guild.
///
/// Created once at startup and stored in the framework data; players are created on
/// first use and dropped on leave. A closed player is never handed out again.
pub struct PlayerRegistry {
    players: DashMap<GuildId, Arc<MusicPlayer>>,
    transport: Arc<dyn VoiceTransport>,
}

impl PlayerRegistry {
    pub fn new(transport: Arc<dyn VoiceTransport>) -> Self {
        Self {
            players: DashMap::new(),
            transport,
        }
    }

    /// Get the guild's player, creating an idle one if it has none or its old one was closed.
    pub fn get_or_create(&self, guild_id: GuildId) -> Arc<MusicPlayer> {
        let mut entry = self.players.entry(guild_id).or_insert_with(|| {
            info!("Creating music player for guild {}", guild_id);
            MusicPlayer::new(guild_id, Arc::clone(&self.transport))
        });

        if entry.is_closed() {
            info!("Replacing closed music player for guild {}", guild_id);
            *entry = MusicPlayer::new(guild_id, Arc::clone(&self.transport));
        }

        entry.value().clone()
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<MusicPlayer>> {
        self.players
            .get(&guild_id)
            .map(|player| player.value().clone())
            .filter(|player| !player.is_closed())
    }

    /// Forget `player` if it is still the one registered for its guild.
    ///
    /// A replacement created after `player` was closed is left alone.
    pub fn remove(&self, player: &Arc<MusicPlayer>) -> Option<Arc<MusicPlayer>> {
        self.players
            .remove_if(&player.guild_id(), |_, current| Arc::ptr_eq(current, player))
            .map(|(_, removed)| removed)
    }
}
