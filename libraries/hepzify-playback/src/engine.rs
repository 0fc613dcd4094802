//! Playback engine
//!
//! The single authority over what is loaded, whether it plays, and what
//! plays next.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::output::{AudioOutput, OutputEvent};
use crate::session::PlaybackSession;
use crate::subscribers::{Subscriber, Subscribers, SubscriptionId};
use crate::types::{Direction, PlaybackConfig, PlaybackSnapshot, PlaybackState};
use hepzify_core::types::Track;
use std::time::Duration;

/// Drives an [`AudioOutput`] through the Idle / Paused / Playing states
///
/// Every operation that changes the active track, the playing flag, the
/// position, the duration or the failure publishes a [`PlaybackSnapshot`] to
/// all subscribers before returning.
#[derive(Debug)]
pub struct PlaybackEngine<O: AudioOutput> {
    session: PlaybackSession,
    output: O,
    config: PlaybackConfig,
    subscribers: Subscribers,

    // Event queue for consumers that poll; unbounded until drained
    pending_events: Vec<PlaybackEvent>,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    /// Create an idle engine
    pub fn new(output: O, config: PlaybackConfig) -> Self {
        Self {
            session: PlaybackSession::default(),
            output,
            config,
            subscribers: Subscribers::default(),
            pending_events: Vec::new(),
        }
    }

    // ===== Selection =====

    /// Play `track`, chosen from `queue`.
    ///
    /// Selecting the active track again toggles play/pause. Selecting any
    /// other track stops the current output, makes `track` active from
    /// position zero, adopts `queue` for next/previous and starts playing.
    ///
    /// If the output refuses to start, the failure is recorded in the
    /// session and the track stays loaded but paused; this is not an `Err`.
    pub fn select_track(&mut self, track: Track, queue: Vec<Track>) -> Result<()> {
        if self.is_active(&track) {
            return self.toggle_play_pause();
        }

        self.replace_queue(queue);
        self.switch_to(track);
        Ok(())
    }

    /// Replace the play queue without touching the active track
    pub fn set_queue(&mut self, queue: Vec<Track>) {
        self.replace_queue(queue);
        self.publish();
    }

    // ===== Playback Control =====

    /// Flip between playing and paused
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.session.is_playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Resume the active track. No-op if already playing.
    pub fn play(&mut self) -> Result<()> {
        self.require_track()?;
        if self.session.is_playing {
            return Ok(());
        }

        match self.output.play() {
            Ok(()) => {
                self.session.is_playing = true;
                self.session.failure = None;
                self.emit_state_changed();
            }
            Err(err) => self.record_failure(&err),
        }
        self.publish();
        Ok(())
    }

    /// Pause the active track. No-op if already paused.
    pub fn pause(&mut self) -> Result<()> {
        self.require_track()?;
        if !self.session.is_playing {
            return Ok(());
        }

        self.output.pause();
        self.session.is_playing = false;
        self.emit_state_changed();
        self.publish();
        Ok(())
    }

    /// Stop output and unload the active track. The queue is kept.
    pub fn stop(&mut self) {
        if self.session.active_track.is_none() {
            return;
        }

        self.output.stop();
        self.session.active_track = None;
        self.session.is_playing = false;
        self.session.position = Duration::ZERO;
        self.session.duration = None;
        self.emit_state_changed();
        self.publish();
    }

    // ===== Seek =====

    /// Move to `position`, clamped into `[0, duration]`
    ///
    /// Play/pause state is unchanged.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        self.require_track()?;

        let target = self.session.clamp_position(position);
        self.session.position = target;
        if let Err(err) = self.output.seek(target) {
            // The output keeps its old position; the session still reflects
            // the request so the progress bar does not jump back.
            tracing::warn!(error = %err, "output rejected seek");
            self.session.failure = Some(err.to_string());
            self.emit_failed(err.to_string());
        }
        self.emit_position_changed();
        self.publish();
        Ok(())
    }

    /// Seek from a UI slider in seconds. Negative and NaN inputs clamp to zero.
    pub fn seek_seconds(&mut self, seconds: f64) -> Result<()> {
        let position = if seconds.is_finite() && seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        } else if seconds == f64::INFINITY {
            Duration::MAX
        } else {
            Duration::ZERO
        };
        self.seek(position)
    }

    // ===== Sequencing =====

    /// Move to the neighbouring track in the play queue, wrapping at both
    /// ends, and start it.
    ///
    /// The target is always reloaded from the start, even when it is the
    /// active track (a single-track queue restarts it).
    ///
    /// Fails without changing anything when the queue is empty or the active
    /// track is not in it.
    pub fn advance(&mut self, direction: Direction) -> Result<()> {
        if self.session.play_queue.is_empty() {
            tracing::debug!(?direction, "advance on empty queue");
            return Err(PlaybackError::QueueEmpty);
        }
        let Some(index) = self.session.current_index() else {
            tracing::debug!(?direction, "active track not in queue");
            return Err(PlaybackError::TrackNotInQueue);
        };

        if direction == Direction::Previous && self.past_restart_threshold() {
            return self.restart();
        }

        let target = direction.step(index, self.session.play_queue.len());
        let track = self.session.play_queue[target].clone();
        self.switch_to(track);
        Ok(())
    }

    /// Shorthand for `advance(Direction::Next)`
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        self.advance(Direction::Next)
    }

    /// Shorthand for `advance(Direction::Previous)`
    pub fn previous(&mut self) -> Result<()> {
        self.advance(Direction::Previous)
    }

    // ===== Output callbacks =====

    /// Dispatch a notification from the output
    pub fn handle_output_event(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::Ready { duration } => self.on_ready(duration),
            OutputEvent::Progress { position } => self.on_position(position),
            OutputEvent::Ended => self.on_track_ended(),
            OutputEvent::Error { message } => self.on_error(message),
        }
    }

    /// The output knows the real duration of the active track
    pub fn on_ready(&mut self, duration: Duration) {
        if self.session.active_track.is_none() {
            return;
        }
        self.session.duration = Some(duration);
        self.session.position = self.session.clamp_position(self.session.position);
        self.publish();
    }

    /// Periodic progress. Positions only move forward; use `seek` to go back.
    pub fn on_position(&mut self, position: Duration) {
        if self.session.active_track.is_none() {
            return;
        }
        let position = self.session.clamp_position(position);
        if position <= self.session.position {
            return;
        }
        self.session.position = position;
        self.emit_position_changed();
        self.publish();
    }

    /// Natural end of the active track: continue with the next one.
    ///
    /// The queue is cyclic, so the last track is followed by the first.
    pub fn on_track_ended(&mut self) {
        let Some(track_id) = self.active_id() else {
            return;
        };

        self.session.is_playing = false;
        self.pending_events.push(PlaybackEvent::TrackFinished { track_id });

        if let Err(err) = self.advance(Direction::Next) {
            tracing::debug!(error = %err, "no track to continue with");
            self.session.failure = Some(err.to_string());
            self.emit_state_changed();
            self.publish();
        }
    }

    /// The output failed after accepting a request
    pub fn on_error(&mut self, message: impl Into<String>) {
        if self.session.active_track.is_none() {
            return;
        }
        self.output.pause();
        self.record_failure(&PlaybackError::output(message));
        self.publish();
    }

    // ===== Subscriptions =====

    /// Register a callback for every future snapshot
    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        self.subscribers.add(subscriber)
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        match (&self.session.active_track, self.session.is_playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn queue(&self) -> &[Track] {
        self.session.play_queue()
    }

    /// Index of the active track in the queue
    pub fn current_index(&self) -> Option<usize> {
        self.session.current_index()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state(),
            active_track: self.session.active_track.clone(),
            is_playing: self.session.is_playing,
            position: self.session.position,
            duration: self.session.duration,
            queue_len: self.session.play_queue.len(),
            queue_index: self.session.current_index(),
            failure: self.session.failure.clone(),
        }
    }

    // ===== Events =====

    /// Take all events accumulated since the last call.
    ///
    /// The queue is not capped. Hosts must drain it regularly, even when
    /// they only listen through subscribers, or it keeps growing.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn is_active(&self, track: &Track) -> bool {
        self.session
            .active_track
            .as_ref()
            .is_some_and(|active| active.id == track.id)
    }

    fn active_id(&self) -> Option<String> {
        self.session
            .active_track
            .as_ref()
            .map(|t| t.id.as_str().to_string())
    }

    fn require_track(&self) -> Result<()> {
        if self.session.active_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        Ok(())
    }

    fn past_restart_threshold(&self) -> bool {
        self.config
            .restart_threshold
            .is_some_and(|threshold| self.session.position > threshold)
    }

    fn replace_queue(&mut self, queue: Vec<Track>) {
        self.session.play_queue = queue;
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.session.play_queue.len(),
        });
    }

    /// Make `track` active and start it. Never leaves the previous output
    /// running.
    fn switch_to(&mut self, track: Track) {
        let previous_track_id = self.active_id();

        self.output.stop();
        self.session.is_playing = false;
        self.session.position = Duration::ZERO;
        self.session.duration = track.duration();
        self.session.failure = None;

        let started = self
            .output
            .load(&track)
            .and_then(|()| self.output.play());

        tracing::debug!(track_id = %track.id, ok = started.is_ok(), "switching track");

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.as_str().to_string(),
            previous_track_id,
        });
        self.session.active_track = Some(track);

        match started {
            Ok(()) => {
                self.session.is_playing = true;
                self.emit_state_changed();
            }
            Err(err) => self.record_failure(&err),
        }
        self.publish();
    }

    fn restart(&mut self) -> Result<()> {
        self.session.position = Duration::ZERO;
        if let Err(err) = self.output.seek(Duration::ZERO) {
            self.record_failure(&err);
            self.publish();
            return Ok(());
        }
        self.emit_position_changed();
        if self.session.is_playing {
            self.publish();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Paused with a reported failure; never retried
    fn record_failure(&mut self, err: &PlaybackError) {
        tracing::warn!(error = %err, track_id = ?self.active_id(), "playback failure");
        self.session.is_playing = false;
        self.session.failure = Some(err.to_string());
        self.emit_failed(err.to_string());
        self.emit_state_changed();
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.publish(&snapshot);
    }

    fn emit_state_changed(&mut self) {
        let state = self.state();
        self.pending_events.push(PlaybackEvent::StateChanged { state });
    }

    fn emit_position_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionChanged {
            position_ms: self.session.position.as_millis() as u64,
            duration_ms: self.session.duration.map(|d| d.as_millis() as u64),
        });
    }

    fn emit_failed(&mut self, message: String) {
        self.pending_events.push(PlaybackEvent::PlaybackFailed { message });
    }
}

impl<O: AudioOutput + Default> Default for PlaybackEngine<O> {
    fn default() -> Self {
        Self::new(O::default(), PlaybackConfig::default())
    }
}
