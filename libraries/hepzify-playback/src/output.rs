//! Platform-agnostic audio output
//!
//! The engine never touches audio itself. A platform provides an
//! [`AudioOutput`] (browser audio element, native player, test double) and
//! feeds completion and failure back in as [`OutputEvent`]s.

use crate::error::Result;
use hepzify_core::types::Track;
use std::time::Duration;

/// Audio output driven by the playback engine
///
/// `load` and `play` start asynchronous work on real platforms. Returning
/// `Ok` means the request was accepted; later failures arrive as
/// [`OutputEvent::Error`].
pub trait AudioOutput: Send {
    /// Point the output at the track's audio location
    fn load(&mut self, track: &Track) -> Result<()>;

    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Stop and release the current track
    fn stop(&mut self);

    /// Move the read position
    fn seek(&mut self, position: Duration) -> Result<()>;
}

/// Notifications from the output back to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Metadata loaded; the real duration is known
    Ready { duration: Duration },

    /// Periodic position update while playing
    Progress { position: Duration },

    /// The track played to its end
    Ended,

    /// Output could not start or continue
    Error { message: String },
}

/// Output that accepts every request and produces no sound
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn load(&mut self, _track: &Track) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn stop(&mut self) {}

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }
}
