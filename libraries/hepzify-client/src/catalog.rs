//! Track catalog operations.

use crate::client::HepzifyClient;
use crate::error::Result;
use crate::types::SearchResults;
use hepzify_core::{Track, TrackId};
use tracing::debug;

impl HepzifyClient {
    /// Every track, in the order it was added.
    pub async fn list_all(&self) -> Result<Vec<Track>> {
        let request = self.http.get(self.endpoint("/api/music/all"));
        let tracks: Vec<Track> = self.send_json(request, "track list").await?;
        debug!(tracks = tracks.len(), "Fetched catalog");
        Ok(tracks)
    }

    pub async fn get_track(&self, id: &TrackId) -> Result<Track> {
        let request = self.http.get(self.endpoint(&format!("/api/music/{}", id)));
        self.send_json(request, "track").await
    }

    /// Search tracks by title, artist or genre, and playlists by name.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let request = self
            .http
            .get(self.endpoint("/api/music/search"))
            .query(&[("query", query)]);
        self.send_json(request, "search results").await
    }

    /// Like a track, or take the like back if it is already liked.
    pub async fn like(&self, id: &TrackId) -> Result<Track> {
        let request = self
            .authorized(self.http.post(self.endpoint(&format!("/api/music/{}/like", id))))
            .await?;
        self.send_json(request, "track").await
    }

    pub async fn unlike(&self, id: &TrackId) -> Result<Track> {
        let request = self
            .authorized(self.http.post(self.endpoint(&format!("/api/music/{}/unlike", id))))
            .await?;
        self.send_json(request, "track").await
    }

    /// Tracks the signed-in user has liked.
    pub async fn liked(&self) -> Result<Vec<Track>> {
        let request = self
            .authorized(self.http.get(self.endpoint("/api/music/liked")))
            .await?;
        self.send_json(request, "liked tracks").await
    }

    /// URL a player can fetch audio from; the server answers with a redirect.
    pub fn stream_url(&self, id: &TrackId) -> String {
        self.endpoint(&format!("/api/music/{}/stream", id))
    }
}
