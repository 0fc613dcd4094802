/// Music catalog API routes
use crate::{
    api::upload::{parse_multipart, store_file},
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::object_store::{AUDIO_EXTENSIONS, IMAGE_EXTENSIONS},
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use hepzify_core::{Comment, CreateComment, CreateTrack, Playlist, Track, TrackId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub songs: Vec<Track>,
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

/// GET /api/music/all
pub async fn list_all(State(app_state): State<AppState>) -> Result<Json<Vec<Track>>> {
    Ok(Json(app_state.catalog.list_all().await?))
}

/// GET /api/music/search?query=
pub async fn search(
    State(app_state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let query = params
        .query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Search query is required".to_string()))?;

    let songs = app_state.catalog.search(&query).await?;
    let playlists = app_state.playlists.search_playlists(&query).await?;

    Ok(Json(SearchResponse { songs, playlists }))
}

/// GET /api/music/title/:title
pub async fn get_by_title(
    Path(title): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    Ok(Json(app_state.catalog.find_by_title(&title).await?))
}

/// GET /api/music/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Track>> {
    Ok(Json(app_state.catalog.find_by_id(&TrackId::new(id)).await?))
}

/// GET /api/music/:id/stream
/// Redirects to wherever the audio is stored
pub async fn stream(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse> {
    let track = app_state.catalog.find_by_id(&TrackId::new(id)).await?;
    tracing::debug!(track_id = %track.id, "streaming track");

    Ok((StatusCode::FOUND, [(header::LOCATION, track.audio_url)]))
}

/// POST /api/music/:id/like
pub async fn like(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Track>> {
    let track = app_state
        .catalog
        .like(&TrackId::new(id), auth.user_id())
        .await?;
    Ok(Json(track))
}

/// POST /api/music/:id/unlike
pub async fn unlike(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Track>> {
    let track = app_state
        .catalog
        .unlike(&TrackId::new(id), auth.user_id())
        .await?;
    Ok(Json(track))
}

/// GET /api/music/liked
pub async fn liked(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Track>>> {
    Ok(Json(app_state.catalog.list_liked(auth.user_id()).await?))
}

/// POST /api/music/upload
/// Multipart form: `audio` file plus `title`, `artist`, `genre` and optional
/// `imageUrl` and `durationMs`
pub async fn upload(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Track>)> {
    let mut form = parse_multipart(&headers, body).await?;

    let audio = form
        .take_file("audio")
        .ok_or_else(|| ServerError::BadRequest("Audio file is required".to_string()))?;

    let duration_ms = form
        .text("durationMs")
        .map(|v| v.parse::<u64>())
        .transpose()
        .map_err(|_| ServerError::BadRequest("durationMs must be a number".to_string()))?;

    let mut input = CreateTrack {
        title: form.text("title").unwrap_or_default(),
        artist: form.text("artist").unwrap_or_default(),
        genre: form.text("genre").unwrap_or_default(),
        audio_url: String::new(),
        image_url: form.text("imageUrl"),
        duration_ms,
    };

    let stored = store_file(app_state.object_store.as_ref(), "audio", audio, AUDIO_EXTENSIONS).await?;
    input.audio_url = stored.url;

    match app_state.catalog.create_track(input).await {
        Ok(track) => {
            tracing::info!(track_id = %track.id, user_id = %auth.user_id(), "track uploaded");
            Ok((StatusCode::CREATED, Json(track)))
        }
        Err(e) => {
            // Nothing references the file now
            if let Err(cleanup) = app_state.object_store.delete(&stored.key).await {
                tracing::warn!(key = %stored.key, "failed to remove orphaned upload: {}", cleanup);
            }
            Err(e.into())
        }
    }
}

/// POST /api/music/upload-image
pub async fn upload_image(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ImageUploadResponse>)> {
    let mut form = parse_multipart(&headers, body).await?;
    let image = form
        .take_file("image")
        .ok_or_else(|| ServerError::BadRequest("Image file is required".to_string()))?;

    let stored = store_file(app_state.object_store.as_ref(), "images", image, IMAGE_EXTENSIONS).await?;

    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse {
            image_url: stored.url,
        }),
    ))
}

/// DELETE /api/music/:id
pub async fn delete_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    let track_id = TrackId::new(id);
    let track = app_state.catalog.find_by_id(&track_id).await?;

    app_state.catalog.delete_track(&track_id).await?;
    tracing::info!(track_id = %track_id, user_id = %auth.user_id(), "track deleted");

    // Remove stored files we own; external URLs are left alone
    for url in [&track.audio_url, &track.image_url] {
        if let Some(key) = app_state.object_store.key_for_url(url) {
            if let Err(e) = app_state.object_store.delete(&key).await {
                tracing::warn!(key = %key, "failed to remove stored object: {}", e);
            }
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/music/:id/comments
pub async fn list_comments(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Comment>>> {
    let track = app_state.catalog.find_by_id(&TrackId::new(id)).await?;
    Ok(Json(app_state.comments.list_comments(&track.id).await?))
}

/// POST /api/music/:id/comments
pub async fn add_comment(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = app_state
        .comments
        .add_comment(&TrackId::new(id), auth.user_id(), &req.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
