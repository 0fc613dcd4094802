/// Playlists API routes
///
/// Every route is owner-scoped: a playlist belonging to someone else is
/// reported as not found.
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hepzify_core::{CreatePlaylist, Playlist, PlaylistId, PlaylistWithTracks, Track, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    pub song_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// What a player needs to start a playlist
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStreamResponse {
    pub playlist_name: String,
    pub description: Option<String>,
    pub songs: Vec<Track>,
    pub autoplay: bool,
}

/// GET /api/playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistWithTracks>>> {
    let playlists = app_state.playlists.list_playlists(auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylist>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .playlists
        .create_playlist(auth.user_id(), req)
        .await?;
    tracing::info!(playlist_id = %playlist.id, user_id = %auth.user_id(), "playlist created");
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistWithTracks>> {
    let playlist = app_state
        .playlists
        .get_playlist(&PlaylistId::new(id), auth.user_id())
        .await?;
    Ok(Json(playlist))
}

/// GET /api/playlists/:id/stream
pub async fn stream_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistStreamResponse>> {
    let PlaylistWithTracks { playlist, songs } = app_state
        .playlists
        .get_playlist(&PlaylistId::new(id), auth.user_id())
        .await?;

    Ok(Json(PlaylistStreamResponse {
        playlist_name: playlist.name,
        description: playlist.description,
        songs,
        autoplay: true,
    }))
}

/// POST /api/playlists/:id/songs
pub async fn add_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTrackRequest>,
) -> Result<Json<PlaylistWithTracks>> {
    let playlist = app_state
        .playlists
        .add_track(
            &PlaylistId::new(id),
            auth.user_id(),
            &TrackId::new(req.song_id),
        )
        .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id/songs/:song_id
pub async fn remove_track(
    Path((id, song_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistWithTracks>> {
    let playlist = app_state
        .playlists
        .remove_track(&PlaylistId::new(id), auth.user_id(), &TrackId::new(song_id))
        .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    app_state
        .playlists
        .delete_playlist(&PlaylistId::new(id), auth.user_id())
        .await?;

    Ok(Json(MessageResponse {
        message: "Playlist deleted successfully".to_string(),
    }))
}
