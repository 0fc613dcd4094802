//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// All of these are recoverable: the engine is left in a consistent state
/// and the caller may keep issuing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// The active track is not part of the play queue, so there is no
    /// neighbour to move to
    #[error("Active track is not in the play queue")]
    TrackNotInQueue,

    /// The audio output could not start or continue
    #[error("Playback failed: {0}")]
    Output(String),
}

impl PlaybackError {
    /// Create an output failure
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
