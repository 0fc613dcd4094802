use crate::time::{from_millis, like_pattern, now_millis};
use crate::tracks;
use hepzify_core::{
    error::{HepzifyError, Result},
    types::{CreatePlaylist, Playlist, PlaylistId, PlaylistWithTracks, Track, TrackId, UserId},
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        owner_id: row.get("owner_id"),
        track_ids: Vec::new(),
        created_at: from_millis(row.get("created_at")),
    }
}

fn not_found(id: &PlaylistId) -> HepzifyError {
    HepzifyError::not_found("Playlist", id.as_str())
}

async fn track_ids(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Vec<TrackId>> {
    let ids = sqlx::query_scalar(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(conn)
    .await?;
    Ok(ids)
}

/// Load a playlist the caller owns.
///
/// A playlist owned by someone else is reported exactly like a missing one.
async fn get_owned_on(
    conn: &mut SqliteConnection,
    id: &PlaylistId,
    owner: &UserId,
) -> Result<Playlist> {
    let row = sqlx::query(
        "SELECT id, name, description, owner_id, created_at FROM playlists WHERE id = ? AND owner_id = ?",
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await?;

    let mut playlist = row.as_ref().map(playlist_from_row).ok_or_else(|| not_found(id))?;
    playlist.track_ids = track_ids(conn, id).await?;
    Ok(playlist)
}

async fn append_track(conn: &mut SqliteConnection, id: &PlaylistId, track: &TrackId) -> Result<()> {
    if tracks::get_by_id(&mut *conn, track).await?.is_none() {
        return Err(HepzifyError::not_found("Track", track.as_str()));
    }

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO playlist_tracks (playlist_id, track_id, position, added_at)
        VALUES (?1, ?2, (SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_tracks WHERE playlist_id = ?1), ?3)
        "#,
    )
    .bind(id)
    .bind(track)
    .bind(now_millis())
    .execute(conn)
    .await?;
    Ok(())
}

/// Tracks of a playlist in playlist order
pub async fn tracks_of(pool: &SqlitePool, id: &PlaylistId) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.title, t.artist, t.genre, t.audio_url, t.image_url,
               t.duration_ms, t.created_at, t.updated_at,
               (SELECT GROUP_CONCAT(l.user_id, ',') FROM track_likes l WHERE l.track_id = t.id) AS likes
        FROM playlist_tracks pt
        INNER JOIN tracks t ON t.id = pt.track_id
        WHERE pt.playlist_id = ?
        ORDER BY pt.position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tracks::from_row).collect())
}

async fn populate(pool: &SqlitePool, playlist: Playlist) -> Result<PlaylistWithTracks> {
    let songs = tracks_of(pool, &playlist.id).await?;
    Ok(PlaylistWithTracks { playlist, songs })
}

/// Create a playlist, inserting any initial tracks in order
pub async fn create(pool: &SqlitePool, owner: &UserId, input: CreatePlaylist) -> Result<Playlist> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(HepzifyError::invalid_input("Playlist name is required"));
    }

    let id = PlaylistId::generate();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO playlists (id, name, description, owner_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(input.description.as_deref())
    .bind(owner)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;

    for track in &input.track_ids {
        append_track(&mut tx, &id, track).await?;
    }

    let playlist = get_owned_on(&mut tx, &id, owner).await?;
    tx.commit().await?;

    tracing::debug!(playlist_id = %id, owner = %owner, "playlist created");
    Ok(playlist)
}

/// Get playlist by ID, scoped to its owner
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId, owner: &UserId) -> Result<Playlist> {
    let mut conn = pool.acquire().await?;
    get_owned_on(&mut conn, id, owner).await
}

/// Get playlist by ID with its tracks resolved
pub async fn get_with_tracks(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner: &UserId,
) -> Result<PlaylistWithTracks> {
    let playlist = get_by_id(pool, id, owner).await?;
    populate(pool, playlist).await
}

/// All playlists of `owner`, newest first, with tracks resolved
pub async fn get_for_owner(pool: &SqlitePool, owner: &UserId) -> Result<Vec<PlaylistWithTracks>> {
    let ids: Vec<PlaylistId> = sqlx::query_scalar(
        "SELECT id FROM playlists WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    let mut playlists = Vec::with_capacity(ids.len());
    for id in &ids {
        playlists.push(get_with_tracks(pool, id, owner).await?);
    }
    Ok(playlists)
}

/// Append a track. Already present tracks are left where they are.
pub async fn add_track(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner: &UserId,
    track: &TrackId,
) -> Result<PlaylistWithTracks> {
    let mut tx = pool.begin().await?;
    get_owned_on(&mut tx, id, owner).await?;
    append_track(&mut tx, id, track).await?;
    let playlist = get_owned_on(&mut tx, id, owner).await?;
    tx.commit().await?;

    populate(pool, playlist).await
}

/// Remove a track and close the gap in positions
pub async fn remove_track(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner: &UserId,
    track: &TrackId,
) -> Result<PlaylistWithTracks> {
    let mut tx = pool.begin().await?;
    get_owned_on(&mut tx, id, owner).await?;

    let position: Option<i64> = sqlx::query_scalar(
        "SELECT position FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?",
    )
    .bind(id)
    .bind(track)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(position) = position {
        sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
            .bind(id)
            .bind(track)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE playlist_tracks SET position = position - 1 WHERE playlist_id = ? AND position > ?",
        )
        .bind(id)
        .bind(position)
        .execute(&mut *tx)
        .await?;
    }

    let playlist = get_owned_on(&mut tx, id, owner).await?;
    tx.commit().await?;

    populate(pool, playlist).await
}

/// Delete playlist, scoped to its owner
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, owner: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Playlists of any owner matching `query` in name or description
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, description, owner_id, created_at
        FROM playlists
        WHERE name LIKE ?1 ESCAPE '\' OR description LIKE ?1 ESCAPE '\'
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(like_pattern(query))
    .fetch_all(pool)
    .await?;

    let mut conn = pool.acquire().await?;
    let mut playlists = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut playlist = playlist_from_row(row);
        playlist.track_ids = track_ids(&mut conn, &playlist.id).await?;
        playlists.push(playlist);
    }
    Ok(playlists)
}
