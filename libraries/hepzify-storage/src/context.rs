use crate::{comments, create_pool, likes, playlists, run_migrations, tracks, users, StorageError};
use async_trait::async_trait;
use hepzify_core::{
    error::{HepzifyError, Result},
    storage::{Catalog, CommentStore, PlaylistStore, UserStore},
    types::*,
};
use sqlx::SqlitePool;

/// `SQLite` backed implementation of every storage contract
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database and bring the schema up to date
    pub async fn connect(database_url: &str) -> std::result::Result<Self, StorageError> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for Database {
    async fn list_all(&self) -> Result<Vec<Track>> {
        tracks::get_all(&self.pool).await
    }

    async fn find_by_id(&self, id: &TrackId) -> Result<Track> {
        tracks::get_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HepzifyError::not_found("Track", id.as_str()))
    }

    async fn find_by_title(&self, title: &str) -> Result<Track> {
        tracks::find_by_title(&self.pool, title)
            .await?
            .ok_or_else(|| HepzifyError::not_found("Track", title))
    }

    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        tracks::search(&self.pool, query).await
    }

    async fn create_track(&self, input: CreateTrack) -> Result<Track> {
        tracks::create(&self.pool, input).await
    }

    async fn delete_track(&self, id: &TrackId) -> Result<()> {
        tracks::delete(&self.pool, id).await
    }

    async fn like(&self, id: &TrackId, user: &UserId) -> Result<Track> {
        likes::like(&self.pool, id, user).await
    }

    async fn unlike(&self, id: &TrackId, user: &UserId) -> Result<Track> {
        likes::unlike(&self.pool, id, user).await
    }

    async fn list_liked(&self, user: &UserId) -> Result<Vec<Track>> {
        likes::liked_by(&self.pool, user).await
    }
}

#[async_trait]
impl PlaylistStore for Database {
    async fn create_playlist(&self, owner: &UserId, input: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, owner, input).await
    }

    async fn list_playlists(&self, owner: &UserId) -> Result<Vec<PlaylistWithTracks>> {
        playlists::get_for_owner(&self.pool, owner).await
    }

    async fn get_playlist(&self, id: &PlaylistId, owner: &UserId) -> Result<PlaylistWithTracks> {
        playlists::get_with_tracks(&self.pool, id, owner).await
    }

    async fn add_track(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks> {
        playlists::add_track(&self.pool, id, owner, track).await
    }

    async fn remove_track(
        &self,
        id: &PlaylistId,
        owner: &UserId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks> {
        playlists::remove_track(&self.pool, id, owner, track).await
    }

    async fn delete_playlist(&self, id: &PlaylistId, owner: &UserId) -> Result<()> {
        playlists::delete(&self.pool, id, owner).await
    }

    async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>> {
        playlists::search(&self.pool, query).await
    }
}

#[async_trait]
impl UserStore for Database {
    async fn create_user(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        users::create(&self.pool, email, name, password_hash).await
    }

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        users::find_credentials_by_email(&self.pool, email).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User> {
        users::get_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| HepzifyError::not_found("User", id.as_str()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }
}

#[async_trait]
impl CommentStore for Database {
    async fn add_comment(&self, track: &TrackId, user: &UserId, text: &str) -> Result<Comment> {
        comments::add(&self.pool, track, user, text).await
    }

    async fn list_comments(&self, track: &TrackId) -> Result<Vec<Comment>> {
        comments::for_track(&self.pool, track).await
    }
}
