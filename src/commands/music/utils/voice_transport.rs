//! The seam between a guild's player and the voice driver.
//!
//! The player only needs to join/leave a channel and open a stream that reports
//! its end exactly once; [`SongbirdTransport`] provides that on top of songbird.

use super::event_handlers::{CompletionNotifier, SongEndNotifier};
use super::music_manager::{MusicError, MusicResult};
use crate::HTTP_CLIENT;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::input::YoutubeDl;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Event, Songbird, TrackEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Playback status of a single opened stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Playing,
    Paused,
    Ended,
}

/// Control over one stream opened by a [`VoiceTransport`].
#[async_trait]
pub trait StreamHandle: Send + Sync {
    async fn status(&self) -> StreamStatus;
    fn pause(&self);
    fn resume(&self);
    /// Stop the stream. The transport reports this through the stream's
    /// completion notifier like any other ending.
    fn stop(&self);
}

/// Voice session and audio stream control for all guilds.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Join `channel_id`, moving there if already connected elsewhere in the guild.
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()>;

    async fn disconnect(&self, guild_id: GuildId) -> MusicResult<()>;

    /// The channel the guild's voice session is actually in, if any.
    ///
    /// Can differ from what the player last asked for when the bot is kicked or
    /// dragged to another channel.
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId>;

    /// Begin streaming `track` into the guild's voice session.
    ///
    /// `notifier` must be fired exactly once when the stream ends, whether it
    /// finished, failed or was stopped. It may fire before this call returns.
    async fn start_stream(
        &self,
        guild_id: GuildId,
        track: &TrackMetadata,
        notifier: Arc<CompletionNotifier>,
    ) -> MusicResult<Box<dyn StreamHandle>>;
}

/// [`VoiceTransport`] backed by songbird, with `yt-dlp` + ffmpeg doing the transcoding.
pub struct SongbirdTransport {
    songbird: Arc<Songbird>,
    ytdlp_program: &'static str,
}

impl SongbirdTransport {
    /// `ytdlp_program` is the executable songbird runs to open each stream.
    pub fn new(songbird: Arc<Songbird>, ytdlp_program: &'static str) -> Self {
        Self {
            songbird,
            ytdlp_program,
        }
    }

    pub fn ytdlp_program(&self) -> &'static str {
        self.ytdlp_program
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        info!("Joining voice channel {} in guild {}", channel_id, guild_id);
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map(|_call| ())
            .map_err(|e| MusicError::JoinError(e.to_string()))
    }

    async fn disconnect(&self, guild_id: GuildId) -> MusicResult<()> {
        if self.songbird.get(guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        info!("Leaving voice channel in guild {}", guild_id);
        self.songbird
            .remove(guild_id)
            .await
            .map_err(|e| MusicError::LeaveError(e.to_string()))
    }

    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        let call = self.songbird.get(guild_id)?;
        let channel = call.lock().await.current_channel()?;
        Some(ChannelId::new(channel.0.get()))
    }

    async fn start_stream(
        &self,
        guild_id: GuildId,
        track: &TrackMetadata,
        notifier: Arc<CompletionNotifier>,
    ) -> MusicResult<Box<dyn StreamHandle>> {
        let call = self
            .songbird
            .get(guild_id)
            .ok_or(MusicError::NotConnected)?;

        let input = YoutubeDl::new_ytdl_like(
            self.ytdlp_program,
            HTTP_CLIENT.clone(),
            track.source.clone(),
        );

        let handle = {
            let mut handler = call.lock().await;
            debug!("Obtained lock on voice handler for guild {}", guild_id);
            handler.play_only_input(input.into())
        };
        info!("Streaming '{}' in guild {}", track.title, guild_id);

        for event in [TrackEvent::End, TrackEvent::Error] {
            if let Err(e) = handle.add_event(
                Event::Track(event),
                SongEndNotifier::new(Arc::clone(&notifier)),
            ) {
                // The track already finished; nothing will fire for it anymore.
                warn!(
                    "Track '{}' ended before its end handler was attached: {}",
                    track.title, e
                );
                notifier.notify();
                break;
            }
        }

        Ok(Box::new(SongbirdStream { handle }))
    }
}

struct SongbirdStream {
    handle: TrackHandle,
}

#[async_trait]
impl StreamHandle for SongbirdStream {
    async fn status(&self) -> StreamStatus {
        match self.handle.get_info().await {
            Ok(info) => match info.playing {
                PlayMode::Play => StreamStatus::Playing,
                PlayMode::Pause => StreamStatus::Paused,
                _ => StreamStatus::Ended,
            },
            Err(_) => StreamStatus::Ended,
        }
    }

    fn pause(&self) {
        if let Err(e) = self.handle.pause() {
            warn!("Failed to pause track: {}", e);
        }
    }

    fn resume(&self) {
        if let Err(e) = self.handle.play() {
            warn!("Failed to resume track: {}", e);
        }
    }

    fn stop(&self) {
        if let Err(e) = self.handle.stop() {
            debug!("Stop requested for a track that already ended: {}", e);
        }
    }
}
