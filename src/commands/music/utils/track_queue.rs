use super::format_duration;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;
use std::time::Duration;

/// Text rendered for a queue with no entries.
pub const EMPTY_QUEUE_MESSAGE: &str = "Queue is empty.";

/// A queued track.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub metadata: TrackMetadata,
}

/// Append-only list of tracks plus a cursor on the one most recently told to play.
///
/// `cursor == None` means nothing has been started since the queue was last cleared.
/// The cursor never points past the end: an advance that would run off the end is
/// refused and the caller is expected to tear the queue down instead.
#[derive(Debug, Default)]
pub struct TrackQueue {
    entries: Vec<QueueItem>,
    cursor: Option<usize>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track to the end of the queue, returning its 0-based index.
    pub fn append(&mut self, metadata: TrackMetadata) -> usize {
        self.entries.push(QueueItem { metadata });
        self.entries.len() - 1
    }

    pub fn current(&self) -> Option<&QueueItem> {
        self.cursor.and_then(|index| self.entries.get(index))
    }

    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.entries.get(index)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index the next advance would move to, if it exists.
    pub fn next_index(&self) -> Option<usize> {
        let next = self.cursor.map_or(0, |index| index + 1);
        (next < self.entries.len()).then_some(next)
    }

    pub fn has_next(&self) -> bool {
        self.next_index().is_some()
    }

    /// Move the cursor forward by one. Returns the new index, or `None` (cursor
    /// untouched) when the queue is exhausted.
    pub fn advance(&mut self) -> Option<usize> {
        let next = self.next_index()?;
        self.cursor = Some(next);
        Some(next)
    }

    /// Point the cursor at `index`. Out-of-range targets are refused.
    pub fn seek(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Sum of all known track durations.
    pub fn total_duration(&self) -> Duration {
        self.entries
            .iter()
            .filter_map(|item| item.metadata.duration)
            .sum()
    }

    /// Human-readable listing with the cursor entry marked by `->`.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_QUEUE_MESSAGE.to_string();
        }

        self.entries
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let marker = if Some(index) == self.cursor {
                    "-> "
                } else {
                    "   "
                };
                let mut line = format!("{}{}. {}", marker, index + 1, item.metadata.title);
                if let Some(duration) = item.metadata.duration {
                    line.push_str(&format!(" [{}]", format_duration(duration)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn track(title: &str) -> TrackMetadata {
        TrackMetadata::new(title, format!("https://example.com/{}", title))
    }

    #[fixture]
    fn three_tracks() -> TrackQueue {
        let mut queue = TrackQueue::new();
        for title in ["Alpha", "Bravo", "Charlie"] {
            queue.append(track(title));
        }
        queue
    }

    #[test]
    fn test_new_queue_is_idle() {
        let queue = TrackQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert_eq!(queue.current(), None);
        assert_eq!(queue.next_index(), None);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut queue = TrackQueue::new();
        assert_eq!(queue.append(track("one")), 0);
        assert_eq!(queue.append(track("two")), 1);

        let titles: Vec<_> = (0..queue.len())
            .filter_map(|index| queue.get(index))
            .map(|item| item.metadata.title.as_str())
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
        assert_eq!(queue.cursor(), None, "appending never starts anything");
    }

    #[rstest]
    fn test_advance_walks_forward(mut three_tracks: TrackQueue) {
        assert_eq!(three_tracks.advance(), Some(0));
        assert_eq!(three_tracks.current().unwrap().metadata.title, "Alpha");
        assert_eq!(three_tracks.advance(), Some(1));
        assert_eq!(three_tracks.advance(), Some(2));
        assert_eq!(three_tracks.current().unwrap().metadata.title, "Charlie");
    }

    #[rstest]
    fn test_advance_refuses_to_run_off_end(mut three_tracks: TrackQueue) {
        for _ in 0..3 {
            three_tracks.advance();
        }
        assert!(!three_tracks.has_next());
        assert_eq!(three_tracks.advance(), None);
        assert_eq!(three_tracks.cursor(), Some(2));
    }

    #[rstest]
    #[case(0, true)]
    #[case(2, true)]
    #[case(3, false)]
    fn test_seek_bounds(mut three_tracks: TrackQueue, #[case] index: usize, #[case] ok: bool) {
        assert_eq!(three_tracks.seek(index), ok);
        assert_eq!(three_tracks.cursor(), ok.then_some(index));
    }

    #[rstest]
    fn test_clear_resets_cursor(mut three_tracks: TrackQueue) {
        three_tracks.advance();
        three_tracks.clear();
        assert!(three_tracks.is_empty());
        assert_eq!(three_tracks.cursor(), None);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(TrackQueue::new().render(), "Queue is empty.");
    }

    #[rstest]
    fn test_render_marks_cursor(mut three_tracks: TrackQueue) {
        three_tracks.seek(1);

        let rendered = three_tracks.render();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec!["   1. Alpha", "-> 2. Bravo", "   3. Charlie"]
        );
    }

    #[rstest]
    fn test_render_before_start_marks_nothing(three_tracks: TrackQueue) {
        assert!(!three_tracks.render().contains("->"));
    }

    #[test]
    fn test_render_includes_known_durations() {
        let mut queue = TrackQueue::new();
        let mut timed = track("Timed");
        timed.duration = Some(Duration::from_secs(225));
        queue.append(timed);
        queue.append(track("Untimed"));

        assert_eq!(queue.render(), "   1. Timed [3:45]\n   2. Untimed");
        assert_eq!(queue.total_duration(), Duration::from_secs(225));
    }
}
