//! Bridges "track finished" notices from the voice driver back into a guild's player.
//!
//! Songbird fires track events from its own tasks. Nothing here touches player state:
//! the notice is turned into a [`PlayerEvent`] and posted to the player's event loop,
//! which applies it under the same lock the commands use.

use serenity::async_trait;
use songbird::{Event, EventContext, EventHandler};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Messages consumed by a player's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The stream started with this generation ended, normally or with an error.
    StreamEnded { generation: u64 },
}

/// One-shot completion signal for a single stream start.
///
/// However many times the transport reports the end of the stream, at most one
/// [`PlayerEvent::StreamEnded`] is posted.
#[derive(Debug)]
pub struct CompletionNotifier {
    generation: u64,
    events: UnboundedSender<PlayerEvent>,
    fired: AtomicBool,
}

impl CompletionNotifier {
    pub fn new(generation: u64, events: UnboundedSender<PlayerEvent>) -> Self {
        Self {
            generation,
            events,
            fired: AtomicBool::new(false),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report that the stream ended. Safe to call from any thread.
    /// Returns `false` if this notifier already fired.
    pub fn notify(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            debug!(
                "Ignoring repeated end signal for stream generation {}",
                self.generation
            );
            return false;
        }

        if self
            .events
            .send(PlayerEvent::StreamEnded {
                generation: self.generation,
            })
            .is_err()
        {
            // The player is gone; nobody is waiting for this stream anymore.
            debug!(
                "Player dropped before stream generation {} ended",
                self.generation
            );
        }
        true
    }
}

/// Songbird handler registered for both `End` and `Error` on every track we start.
pub struct SongEndNotifier {
    notifier: Arc<CompletionNotifier>,
}

impl SongEndNotifier {
    pub fn new(notifier: Arc<CompletionNotifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl EventHandler for SongEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            for (state, _handle) in tracks.iter() {
                if let songbird::tracks::PlayMode::Errored(err) = &state.playing {
                    warn!(
                        "Stream generation {} failed, advancing anyway: {:?}",
                        self.notifier.generation(),
                        err
                    );
                }
            }
            self.notifier.notify();
        }
        None
    }
}
