//! Storage contracts
//!
//! These traits describe what the HTTP layer needs from persistence. The
//! SQLite implementation lives in `hepzify-storage`; tests can swap in
//! anything that implements them.

use crate::error::Result;
use crate::types::{
    Comment, CreatePlaylist, CreateTrack, Playlist, PlaylistId, PlaylistWithTracks, Track,
    TrackId, User, UserCredentials, UserId,
};
use async_trait::async_trait;

/// Track catalog: metadata and like-sets
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All tracks, oldest first
    async fn list_all(&self) -> Result<Vec<Track>>;

    /// Fails with `NotFound` when the id is unknown
    async fn find_by_id(&self, id: &TrackId) -> Result<Track>;

    /// First track whose title contains `title`, ignoring case
    async fn find_by_title(&self, title: &str) -> Result<Track>;

    /// Tracks whose title, artist or genre contains `query`, ignoring case
    async fn search(&self, query: &str) -> Result<Vec<Track>>;

    /// Validates and stores a new track
    async fn create_track(&self, input: CreateTrack) -> Result<Track>;

    /// Removes the track, its likes, comments and playlist entries
    async fn delete_track(&self, id: &TrackId) -> Result<()>;

    /// Toggles `user` in the like-set; liking an already liked track removes the like
    async fn like(&self, id: &TrackId, user: &UserId) -> Result<Track>;

    /// Removes `user` from the like-set. `InvalidInput` if it was not liked.
    async fn unlike(&self, id: &TrackId, user: &UserId) -> Result<Track>;

    /// Tracks liked by `user`
    async fn list_liked(&self, user: &UserId) -> Result<Vec<Track>>;
}

/// Owner-scoped playlist storage.
///
/// Every method taking an `owner` reports `NotFound` when the playlist exists
/// but belongs to someone else, so callers cannot probe for other users' ids.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn create_playlist(&self, owner: &UserId, input: CreatePlaylist) -> Result<Playlist>;

    async fn list_playlists(&self, owner: &UserId) -> Result<Vec<PlaylistWithTracks>>;

    async fn get_playlist(&self, id: &PlaylistId, owner: &UserId) -> Result<PlaylistWithTracks>;

    /// Appends the track; adding a track already present is a no-op
    async fn add_track(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks>;

    async fn remove_track(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks>;

    async fn delete_playlist(&self, id: &PlaylistId, owner: &UserId) -> Result<()>;

    /// Playlists of any owner whose name or description contains `query`
    async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>>;
}

/// User accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Duplicate` when the email is already registered
    async fn create_user(&self, email: &str, name: &str, password_hash: &str) -> Result<User>;

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    async fn get_user(&self, id: &UserId) -> Result<User>;

    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Comments on tracks
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn add_comment(&self, track: &TrackId, user: &UserId, text: &str) -> Result<Comment>;

    /// Oldest first
    async fn list_comments(&self, track: &TrackId) -> Result<Vec<Comment>>;
}
