//! Playlist operations. All of them need a signed-in client.

use crate::client::HepzifyClient;
use crate::error::Result;
use crate::types::AddSongRequest;
use hepzify_core::{CreatePlaylist, Playlist, PlaylistId, PlaylistWithTracks, TrackId};

impl HepzifyClient {
    /// The signed-in user's playlists with their songs.
    pub async fn playlists(&self) -> Result<Vec<PlaylistWithTracks>> {
        let request = self
            .authorized(self.http.get(self.endpoint("/api/playlists")))
            .await?;
        self.send_json(request, "playlists").await
    }

    pub async fn create_playlist(&self, input: &CreatePlaylist) -> Result<Playlist> {
        let request = self
            .authorized(self.http.post(self.endpoint("/api/playlists")))
            .await?
            .json(input);
        self.send_json(request, "playlist").await
    }

    pub async fn get_playlist(&self, id: &PlaylistId) -> Result<PlaylistWithTracks> {
        let request = self
            .authorized(self.http.get(self.endpoint(&format!("/api/playlists/{}", id))))
            .await?;
        self.send_json(request, "playlist").await
    }

    pub async fn add_to_playlist(
        &self,
        id: &PlaylistId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks> {
        let request = self
            .authorized(
                self.http
                    .post(self.endpoint(&format!("/api/playlists/{}/songs", id))),
            )
            .await?
            .json(&AddSongRequest {
                song_id: track.as_str(),
            });
        self.send_json(request, "playlist").await
    }

    pub async fn remove_from_playlist(
        &self,
        id: &PlaylistId,
        track: &TrackId,
    ) -> Result<PlaylistWithTracks> {
        let request = self
            .authorized(
                self.http
                    .delete(self.endpoint(&format!("/api/playlists/{}/songs/{}", id, track))),
            )
            .await?;
        self.send_json(request, "playlist").await
    }

    pub async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let request = self
            .authorized(
                self.http
                    .delete(self.endpoint(&format!("/api/playlists/{}", id))),
            )
            .await?;
        self.send_empty(request).await
    }
}
