//! Playback session state

use hepzify_core::types::Track;
use std::time::Duration;

/// The state of one listener's player.
///
/// Only [`crate::PlaybackEngine`] mutates it, which keeps
/// `is_playing => active_track.is_some()` and
/// `position <= duration` true at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSession {
    pub(crate) active_track: Option<Track>,
    pub(crate) is_playing: bool,
    pub(crate) play_queue: Vec<Track>,
    pub(crate) position: Duration,
    pub(crate) duration: Option<Duration>,
    pub(crate) failure: Option<String>,
}

impl PlaybackSession {
    pub fn active_track(&self) -> Option<&Track> {
        self.active_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn play_queue(&self) -> &[Track] {
        &self.play_queue
    }

    /// Elapsed time in the active track
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Duration reported by the output, or taken from track metadata
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Index of the active track in the play queue
    pub fn current_index(&self) -> Option<usize> {
        let active = self.active_track.as_ref()?;
        self.play_queue.iter().position(|t| t.id == active.id)
    }

    /// Clamp into `[0, duration]`. An unknown duration clamps to zero.
    pub(crate) fn clamp_position(&self, position: Duration) -> Duration {
        position.min(self.duration.unwrap_or(Duration::ZERO))
    }
}
