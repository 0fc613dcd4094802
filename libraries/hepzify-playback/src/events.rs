//! Playback Events
//!
//! Discrete events accumulated by the engine for consumers that prefer
//! polling over callbacks (e.g. forwarding to a UI over IPC). Drained with
//! `PlaybackEngine::drain_events`.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlaybackEvent {
    /// Playing/paused/idle changed
    StateChanged { state: PlaybackState },

    /// A different track became active
    TrackChanged {
        track_id: String,
        previous_track_id: Option<String>,
    },

    /// Position moved by seek or progress
    PositionChanged {
        position_ms: u64,
        duration_ms: Option<u64>,
    },

    /// Track played to its end
    TrackFinished { track_id: String },

    /// Queue was replaced
    QueueChanged { length: usize },

    /// Output failed; the track stays loaded and paused
    PlaybackFailed { message: String },
}
