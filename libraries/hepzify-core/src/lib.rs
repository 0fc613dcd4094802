//! Hepzify Core
//!
//! Domain types, traits, and error handling shared by every Hepzify crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `User`, `Comment` and their ids
//! - **Storage Contracts**: `Catalog`, `PlaylistStore`, `UserStore`, `CommentStore`
//! - **Error Handling**: Unified `HepzifyError` and `Result` types
//!
//! The same `Track` value flows from the catalog into the playback engine,
//! so there is exactly one description of a song across the workspace.
//!
//! # Example
//!
//! ```rust
//! use hepzify_core::types::{CreateTrack, Track, UserId};
//!
//! let input = CreateTrack {
//!     title: "Blue in Green".into(),
//!     artist: "Miles Davis".into(),
//!     genre: "Jazz".into(),
//!     audio_url: "https://cdn.example.com/blue.mp3".into(),
//!     image_url: None,
//!     duration_ms: Some(337_000),
//! };
//! input.validate().unwrap();
//!
//! let mut track = Track::from_create(input);
//! let listener = UserId::generate();
//! track.like(&listener);
//! assert!(track.is_liked_by(&listener));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{HepzifyError, Result};
pub use storage::{Catalog, CommentStore, PlaylistStore, UserStore};

pub use types::{
    Comment, CommentId, CreateComment, CreatePlaylist, CreateTrack, Playlist, PlaylistId,
    PlaylistWithTracks, Track, TrackId, User, UserCredentials, UserId,
};
