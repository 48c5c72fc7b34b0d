//! Stand-ins for the voice transport
//!
//! `FakeTransport` behaves like a tiny voice driver: it records every stream it opens
//! and lets a test end streams (firing the completion notifier) or end them silently
//! and deliver the notice later. `MockTransport` is a plain mockall mock for checking
//! call expectations.

use async_trait::async_trait;
use mockall::mock;
use rusty_jukebox::commands::music::audio_sources::track_metadata::TrackMetadata;
use rusty_jukebox::commands::music::utils::event_handlers::CompletionNotifier;
use rusty_jukebox::commands::music::utils::music_manager::{MusicError, MusicResult};
use rusty_jukebox::commands::music::utils::voice_transport::{
    StreamHandle, StreamStatus, VoiceTransport,
};
use serenity::model::id::{ChannelId, GuildId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mock! {
    pub Transport {}

    #[async_trait]
    impl VoiceTransport for Transport {
        async fn connect(&self, guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()>;
        async fn disconnect(&self, guild_id: GuildId) -> MusicResult<()>;
        async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId>;
        async fn start_stream(
            &self,
            guild_id: GuildId,
            track: &TrackMetadata,
            notifier: Arc<CompletionNotifier>,
        ) -> MusicResult<Box<dyn StreamHandle>>;
    }
}

/// One stream opened by the fake transport.
pub struct FakeStream {
    pub title: String,
    status: Mutex<StreamStatus>,
    notifier: Arc<CompletionNotifier>,
}

impl FakeStream {
    pub fn status(&self) -> StreamStatus {
        *self.status.lock().unwrap()
    }

    /// End the stream the way a driver would: mark it ended and fire its notifier.
    pub fn end(&self) {
        let previous = std::mem::replace(&mut *self.status.lock().unwrap(), StreamStatus::Ended);
        if previous != StreamStatus::Ended {
            self.notifier.notify();
        }
    }

    /// Mark the stream ended but hold back its notifier, which the test fires later.
    pub fn end_silently(&self) -> Arc<CompletionNotifier> {
        *self.status.lock().unwrap() = StreamStatus::Ended;
        Arc::clone(&self.notifier)
    }
}

struct FakeStreamHandle(Arc<FakeStream>);

#[async_trait]
impl StreamHandle for FakeStreamHandle {
    async fn status(&self) -> StreamStatus {
        self.0.status()
    }

    fn pause(&self) {
        let mut status = self.0.status.lock().unwrap();
        if *status == StreamStatus::Playing {
            *status = StreamStatus::Paused;
        }
    }

    fn resume(&self) {
        let mut status = self.0.status.lock().unwrap();
        if *status == StreamStatus::Paused {
            *status = StreamStatus::Playing;
        }
    }

    fn stop(&self) {
        self.0.end();
    }
}

#[derive(Default)]
pub struct FakeTransport {
    connects: Mutex<Vec<ChannelId>>,
    disconnects: AtomicUsize,
    channel: Mutex<Option<ChannelId>>,
    attempts: Mutex<Vec<String>>,
    streams: Mutex<Vec<Arc<FakeStream>>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every future start of `title` fail.
    pub fn fail_title(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    pub fn connects(&self) -> Vec<ChannelId> {
        self.connects.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Drop the voice session without the player asking, like a moderator kick.
    pub fn kick(&self) {
        *self.channel.lock().unwrap() = None;
    }

    /// Move the voice session to `channel_id` without the player asking.
    pub fn drag_to(&self, channel_id: ChannelId) {
        *self.channel.lock().unwrap() = Some(channel_id);
    }

    /// Titles of every start request, including failed ones.
    pub fn attempted_titles(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Titles of streams that were actually opened, in order.
    pub fn started_titles(&self) -> Vec<String> {
        self.streams
            .lock()
            .unwrap()
            .iter()
            .map(|stream| stream.title.clone())
            .collect()
    }

    pub fn stream(&self, index: usize) -> Arc<FakeStream> {
        Arc::clone(&self.streams.lock().unwrap()[index])
    }

    pub fn last_stream(&self) -> Arc<FakeStream> {
        let streams = self.streams.lock().unwrap();
        Arc::clone(streams.last().expect("no stream has been started"))
    }
}

#[async_trait]
impl VoiceTransport for FakeTransport {
    async fn connect(&self, _guild_id: GuildId, channel_id: ChannelId) -> MusicResult<()> {
        self.connects.lock().unwrap().push(channel_id);
        *self.channel.lock().unwrap() = Some(channel_id);
        Ok(())
    }

    async fn disconnect(&self, _guild_id: GuildId) -> MusicResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        *self.channel.lock().unwrap() = None;
        Ok(())
    }

    async fn current_channel(&self, _guild_id: GuildId) -> Option<ChannelId> {
        *self.channel.lock().unwrap()
    }

    async fn start_stream(
        &self,
        _guild_id: GuildId,
        track: &TrackMetadata,
        notifier: Arc<CompletionNotifier>,
    ) -> MusicResult<Box<dyn StreamHandle>> {
        self.attempts.lock().unwrap().push(track.title.clone());

        if self.failing.lock().unwrap().contains(&track.title) {
            return Err(MusicError::StreamError(format!(
                "cannot open {}",
                track.source
            )));
        }

        let stream = Arc::new(FakeStream {
            title: track.title.clone(),
            status: Mutex::new(StreamStatus::Playing),
            notifier,
        });
        self.streams.lock().unwrap().push(Arc::clone(&stream));

        Ok(Box::new(FakeStreamHandle(stream)))
    }
}
