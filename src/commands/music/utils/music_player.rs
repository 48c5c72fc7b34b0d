//! Per-guild playback controller.
//!
//! All state (queue, cursor, connection, active stream) sits behind one async mutex.
//! Commands lock it directly; stream-end notices arrive on an mpsc channel and are
//! applied by the player's event loop under the same lock, so at most one mutation
//! of a guild's playback state is ever in flight.
//!
//! Every stream start is stamped with a fresh generation. An end notice only advances
//! the queue if its generation is still the active stream's; anything else (a stream
//! we already moved past, or one that was stopped along with the whole player) is
//! dropped.

use super::event_handlers::{CompletionNotifier, PlayerEvent};
use super::music_manager::{MusicError, MusicResult};
use super::track_queue::{QueueItem, TrackQueue};
use super::voice_transport::{StreamHandle, StreamStatus, VoiceTransport};
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Caller-visible state of a guild's player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Not connected to voice.
    Idle,
    /// Connected, nothing playing.
    Connected,
    Playing,
    Paused,
}

/// Point-in-time view of a player, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub cursor: Option<usize>,
    pub len: usize,
    pub channel_id: Option<ChannelId>,
    pub status: PlayerStatus,
}

/// Result of queueing a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// 1-based position of the new track in the queue.
    pub position: usize,
    /// Whether this call started playback.
    pub started: bool,
}

/// The queue as shown to users, read in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueListing {
    pub rendered: String,
    pub len: usize,
    pub total_duration: Duration,
}

struct ActiveStream {
    generation: u64,
    handle: Box<dyn StreamHandle>,
}

#[derive(Default)]
struct PlayerState {
    queue: TrackQueue,
    channel_id: Option<ChannelId>,
    stream: Option<ActiveStream>,
    // Entry the next advance should jump to instead of cursor + 1.
    pending_seek: Option<usize>,
    generation: u64,
}

impl PlayerState {
    async fn stream_status(&self) -> Option<StreamStatus> {
        match &self.stream {
            Some(stream) => Some(stream.handle.status().await),
            None => None,
        }
    }

    /// Whether a stream is playing or paused right now.
    async fn is_busy(&self) -> bool {
        matches!(
            self.stream_status().await,
            Some(StreamStatus::Playing | StreamStatus::Paused)
        )
    }
}

/// Queue and transport control for one guild.
pub struct MusicPlayer {
    guild_id: GuildId,
    transport: Arc<dyn VoiceTransport>,
    events: UnboundedSender<PlayerEvent>,
    state: Mutex<PlayerState>,
    // Set once by `close`, under the state lock.
    closed: AtomicBool,
}

impl MusicPlayer {
    /// Create an idle player and spawn its event loop on the current tokio runtime.
    pub fn new(guild_id: GuildId, transport: Arc<dyn VoiceTransport>) -> Arc<Self> {
        let (events, receiver) = mpsc::unbounded_channel();
        let player = Arc::new(Self {
            guild_id,
            transport,
            events,
            state: Mutex::new(PlayerState::default()),
            closed: AtomicBool::new(false),
        });

        tokio::spawn(Self::run_event_loop(Arc::downgrade(&player), receiver));
        debug!("Created music player for guild {}", guild_id);

        player
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    async fn run_event_loop(player: Weak<Self>, mut receiver: UnboundedReceiver<PlayerEvent>) {
        while let Some(event) = receiver.recv().await {
            let Some(player) = player.upgrade() else {
                break;
            };
            match event {
                PlayerEvent::StreamEnded { generation } => {
                    player.handle_stream_end(generation).await;
                }
            }
        }
        debug!("Music player event loop finished");
    }

    async fn handle_stream_end(&self, generation: u64) {
        let mut state = self.state.lock().await;

        let is_current = state
            .stream
            .as_ref()
            .is_some_and(|stream| stream.generation == generation);
        if !is_current {
            debug!(
                "Ignoring stale end signal (generation {}) in guild {}",
                generation, self.guild_id
            );
            return;
        }

        info!("Track ended for guild {}", self.guild_id);
        state.stream = None;
        self.advance_locked(&mut state).await;
    }

    /// Whether `close` has run. A closed player refuses to connect or queue.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> MusicResult<()> {
        if self.is_closed() {
            return Err(MusicError::PlayerClosed);
        }
        Ok(())
    }

    /// Connect to `channel_id`, or move there. No-op when already there.
    pub async fn connect(&self, channel_id: ChannelId) -> MusicResult<()> {
        let mut state = self.state.lock().await;
        self.ensure_open()?;
        self.connect_locked(&mut state, channel_id).await
    }

    async fn connect_locked(
        &self,
        state: &mut PlayerState,
        channel_id: ChannelId,
    ) -> MusicResult<()> {
        if state.channel_id == Some(channel_id) {
            // The session may have been dropped or dragged elsewhere behind our back
            match self.transport.current_channel(self.guild_id).await {
                Some(current) if current == channel_id => {
                    debug!(
                        "Already connected to {} in guild {}",
                        channel_id, self.guild_id
                    );
                    return Ok(());
                }
                actual => warn!(
                    "Voice session in guild {} is in {:?} instead of {}, rejoining",
                    self.guild_id, actual, channel_id
                ),
            }
        }

        self.transport.connect(self.guild_id, channel_id).await?;
        state.channel_id = Some(channel_id);
        info!("Connected to {} in guild {}", channel_id, self.guild_id);

        Ok(())
    }

    /// Queue a track and start playback if nothing is playing or paused.
    pub async fn add_track(&self, metadata: TrackMetadata) -> MusicResult<AddOutcome> {
        let mut state = self.state.lock().await;
        self.ensure_open()?;
        self.add_locked(&mut state, metadata).await
    }

    /// Connect (or confirm the connection) and queue a track as one step, so the
    /// queue cannot run dry and disconnect in between.
    pub async fn connect_and_add(
        &self,
        channel_id: ChannelId,
        metadata: TrackMetadata,
    ) -> MusicResult<AddOutcome> {
        let mut state = self.state.lock().await;
        self.ensure_open()?;
        self.connect_locked(&mut state, channel_id).await?;
        self.add_locked(&mut state, metadata).await
    }

    async fn add_locked(
        &self,
        state: &mut PlayerState,
        metadata: TrackMetadata,
    ) -> MusicResult<AddOutcome> {
        if state.channel_id.is_none() {
            return Err(MusicError::NotConnected);
        }

        info!("Queueing '{}' in guild {}", metadata.title, self.guild_id);
        let index = state.queue.append(metadata);

        let started = if state.is_busy().await {
            false
        } else {
            // A stream that has ended but whose end notice is still in flight is
            // replaced here; that notice will then be stale.
            state.stream = None;
            self.advance_locked(state).await;
            state.queue.cursor() == Some(index) && state.stream.is_some()
        };

        Ok(AddOutcome {
            position: index + 1,
            started,
        })
    }

    /// Move to the next entry (or the pending seek target) and start it.
    /// Entries the transport cannot open are passed over; running off the end stops.
    async fn advance_locked(&self, state: &mut PlayerState) {
        let mut next = match state.pending_seek.take() {
            Some(target) if state.queue.seek(target) => Some(target),
            _ => state.queue.advance(),
        };

        while let Some(index) = next {
            let Some(QueueItem { metadata }) = state.queue.get(index).cloned() else {
                break;
            };

            state.generation += 1;
            let generation = state.generation;
            let notifier = Arc::new(CompletionNotifier::new(generation, self.events.clone()));

            match self
                .transport
                .start_stream(self.guild_id, &metadata, notifier)
                .await
            {
                Ok(handle) => {
                    info!(
                        "Playing #{} '{}' in guild {}",
                        index + 1,
                        metadata.title,
                        self.guild_id
                    );
                    state.stream = Some(ActiveStream { generation, handle });
                    return;
                }
                Err(e) => {
                    warn!(
                        "Skipping '{}' in guild {}, stream failed to start: {}",
                        metadata.title, self.guild_id, e
                    );
                    next = state.queue.advance();
                }
            }
        }

        info!("No more tracks in queue for guild {}", self.guild_id);
        self.stop_locked(state).await;
    }

    /// Stop playback, leave the voice channel and forget the queue. Idempotent.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
    }

    /// Stop for good. Callers still holding this player get
    /// [`MusicError::PlayerClosed`] from then on, and the registry replaces it.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
        self.closed.store(true, Ordering::Release);
        info!("Closed music player for guild {}", self.guild_id);
    }

    async fn stop_locked(&self, state: &mut PlayerState) {
        if let Some(stream) = state.stream.take() {
            stream.handle.stop();
        }

        if state.channel_id.take().is_some() {
            if let Err(e) = self.transport.disconnect(self.guild_id).await {
                error!(
                    "Failed to disconnect from voice in guild {}: {}",
                    self.guild_id, e
                );
            }
        }

        state.queue.clear();
        state.pending_seek = None;
        debug!("Player reset for guild {}", self.guild_id);
    }

    /// Pause the playing stream. Returns `false` if nothing is playing.
    pub async fn pause(&self) -> bool {
        let state = self.state.lock().await;
        match &state.stream {
            Some(stream) if stream.handle.status().await == StreamStatus::Playing => {
                stream.handle.pause();
                info!("Paused playback in guild {}", self.guild_id);
                true
            }
            _ => false,
        }
    }

    /// Resume a paused stream. Returns `false` if nothing is paused.
    pub async fn resume(&self) -> bool {
        let state = self.state.lock().await;
        match &state.stream {
            Some(stream) if stream.handle.status().await == StreamStatus::Paused => {
                stream.handle.resume();
                info!("Resumed playback in guild {}", self.guild_id);
                true
            }
            _ => false,
        }
    }

    /// Stop the current stream so its end notice moves the queue on.
    ///
    /// Rejected when nothing is playing or paused, or when there is no next track.
    pub async fn skip(&self) -> bool {
        let state = self.state.lock().await;

        if !state.queue.has_next() || !state.is_busy().await {
            return false;
        }

        if let Some(stream) = &state.stream {
            info!("Skipping track in guild {}", self.guild_id);
            stream.handle.stop();
        }
        true
    }

    /// Go back one entry. Rejected when the cursor is on the first entry or idle.
    pub async fn previous(&self) -> bool {
        let mut state = self.state.lock().await;

        let target = match state.queue.cursor() {
            Some(cursor) if cursor > 0 => cursor - 1,
            _ => return false,
        };

        info!("Going back to #{} in guild {}", target + 1, self.guild_id);
        state.pending_seek = Some(target);

        // The end notice for this stop applies the seek.
        if let Some(stream) = &state.stream {
            stream.handle.stop();
            return true;
        }

        self.advance_locked(&mut state).await;
        true
    }

    pub async fn render(&self) -> String {
        self.state.lock().await.queue.render()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.channel_id.is_some()
    }

    pub async fn status(&self) -> PlayerStatus {
        let state = self.state.lock().await;
        Self::status_locked(&state).await
    }

    async fn status_locked(state: &PlayerState) -> PlayerStatus {
        if state.channel_id.is_none() {
            return PlayerStatus::Idle;
        }
        match state.stream_status().await {
            Some(StreamStatus::Playing) => PlayerStatus::Playing,
            Some(StreamStatus::Paused) => PlayerStatus::Paused,
            _ => PlayerStatus::Connected,
        }
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        let state = self.state.lock().await;
        PlayerSnapshot {
            cursor: state.queue.cursor(),
            len: state.queue.len(),
            channel_id: state.channel_id,
            status: Self::status_locked(&state).await,
        }
    }

    /// Rendered queue, entry count and total length, all from the same moment.
    pub async fn queue_listing(&self) -> QueueListing {
        let state = self.state.lock().await;
        QueueListing {
            rendered: state.queue.render(),
            len: state.queue.len(),
            total_duration: state.queue.total_duration(),
        }
    }
}
