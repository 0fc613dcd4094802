//! Core types for playback management

use hepzify_core::types::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Track loaded, output paused
    Paused,

    /// Track loaded, output running
    Playing,
}

/// Direction for moving through the play queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Index reached by one step from `index` in a cyclic queue of `len`.
    ///
    /// `len` must be non-zero.
    pub(crate) fn step(self, index: usize, len: usize) -> usize {
        match self {
            Self::Next => (index + 1) % len,
            Self::Previous => (index + len - 1) % len,
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// When set, `previous()` past this position restarts the current track
    /// instead of moving back in the queue
    pub restart_threshold: Option<Duration>,
}

/// Everything a view needs to render the player.
///
/// Published to subscribers after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub active_track: Option<Track>,
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub queue_len: usize,
    /// Index of the active track in the queue, if it is there
    pub queue_index: Option<usize>,
    /// Last playback failure, cleared when a track starts successfully
    pub failure: Option<String>,
}
