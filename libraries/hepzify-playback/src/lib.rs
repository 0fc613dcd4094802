//! Hepzify - Playback Engine
//!
//! Platform-agnostic playback session management.
//!
//! This crate provides:
//! - Track selection with play/pause toggle on re-selection
//! - Seek with clamping into the track's duration
//! - Cyclic next/previous over the queue the track was chosen from
//! - Auto-advance when a track ends
//! - Snapshot subscriptions and a drainable event queue for views
//!
//! # Architecture
//!
//! `hepzify-playback` performs no I/O:
//! - No dependency on any audio backend
//! - No dependency on `hepzify-storage` or the HTTP client
//! - Shares the `Track` type with the catalog through `hepzify-core`
//!
//! Audio itself is behind the [`AudioOutput`] trait. The platform reports
//! readiness, progress, completion and failure back as [`OutputEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use hepzify_core::types::{CreateTrack, Track};
//! use hepzify_playback::{NullOutput, PlaybackConfig, PlaybackEngine, PlaybackState};
//!
//! let tracks: Vec<Track> = ["One", "Two"]
//!     .iter()
//!     .map(|title| {
//!         Track::from_create(CreateTrack {
//!             title: title.to_string(),
//!             artist: "Artist".into(),
//!             genre: "Pop".into(),
//!             audio_url: format!("https://cdn.example.com/{title}.mp3"),
//!             image_url: None,
//!             duration_ms: Some(200_000),
//!         })
//!     })
//!     .collect();
//!
//! let mut engine = PlaybackEngine::new(NullOutput, PlaybackConfig::default());
//! engine.subscribe(Box::new(|snapshot| println!("{:?}", snapshot.state)));
//!
//! engine.select_track(tracks[0].clone(), tracks.clone()).unwrap();
//! assert_eq!(engine.state(), PlaybackState::Playing);
//!
//! // Selecting the same track again pauses it
//! engine.select_track(tracks[0].clone(), tracks.clone()).unwrap();
//! assert_eq!(engine.state(), PlaybackState::Paused);
//!
//! // Next wraps around the queue
//! engine.next().unwrap();
//! engine.next().unwrap();
//! assert_eq!(engine.session().active_track().unwrap().id, tracks[0].id);
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod output;
pub mod session;
mod subscribers;
pub mod types;

pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use output::{AudioOutput, NullOutput, OutputEvent};
pub use session::PlaybackSession;
pub use subscribers::{Subscriber, SubscriptionId};
pub use types::{Direction, PlaybackConfig, PlaybackSnapshot, PlaybackState};
