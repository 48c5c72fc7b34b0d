//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across the integration suites

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use rusty_jukebox::commands::music::utils::music_player::{MusicPlayer, PlayerSnapshot};
use std::sync::Once;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::Level;

static INIT: Once = Once::new();

const WAIT_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Initialize tracing for tests
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// Poll the player until `pred` holds, failing the test after a timeout.
pub async fn wait_for_snapshot<F>(player: &MusicPlayer, pred: F) -> PlayerSnapshot
where
    F: Fn(&PlayerSnapshot) -> bool,
{
    let deadline = Instant::now() + WAIT_TIMEOUT;
    loop {
        let snapshot = player.snapshot().await;
        if pred(&snapshot) {
            return snapshot;
        }
        assert!(
            Instant::now() < deadline,
            "player never reached the expected state, last seen: {:?}",
            snapshot
        );
        sleep(POLL_INTERVAL).await;
    }
}

/// Give the player's event loop time to drain anything still queued.
pub async fn settle() {
    sleep(Duration::from_millis(50)).await;
}
