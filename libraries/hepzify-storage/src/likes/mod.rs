use crate::time::now_millis;
use crate::tracks;
use hepzify_core::{
    error::{HepzifyError, Result},
    types::{Track, TrackId, UserId},
};
use sqlx::SqlitePool;

async fn require_track(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| HepzifyError::not_found("Track", id.as_str()))
}

/// Toggle `user` in the track's like-set: a second like takes it back
pub async fn like(pool: &SqlitePool, track_id: &TrackId, user_id: &UserId) -> Result<Track> {
    require_track(pool, track_id).await?;

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM track_likes WHERE track_id = ? AND user_id = ?")
        .bind(track_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if removed.rows_affected() == 0 {
        sqlx::query("INSERT INTO track_likes (track_id, user_id, liked_at) VALUES (?, ?, ?)")
            .bind(track_id)
            .bind(user_id)
            .bind(now_millis())
            .execute(&mut *tx)
            .await?;
    }

    let track = tracks::get_by_id(&mut *tx, track_id)
        .await?
        .ok_or_else(|| HepzifyError::not_found("Track", track_id.as_str()))?;
    tx.commit().await?;

    Ok(track)
}

/// Remove `user` from the like-set
///
/// Fails with `InvalidInput` when the user had not liked the track.
pub async fn unlike(pool: &SqlitePool, track_id: &TrackId, user_id: &UserId) -> Result<Track> {
    require_track(pool, track_id).await?;

    let result = sqlx::query("DELETE FROM track_likes WHERE track_id = ? AND user_id = ?")
        .bind(track_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HepzifyError::invalid_input("Song is not liked"));
    }

    tracks::get_by_id(pool, track_id)
        .await?
        .ok_or_else(|| HepzifyError::not_found("Track", track_id.as_str()))
}

/// Tracks liked by `user`, in catalog order
pub async fn liked_by(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.title, t.artist, t.genre, t.audio_url, t.image_url,
               t.duration_ms, t.created_at, t.updated_at,
               (SELECT GROUP_CONCAT(l2.user_id, ',') FROM track_likes l2 WHERE l2.track_id = t.id) AS likes
        FROM track_likes l
        INNER JOIN tracks t ON t.id = l.track_id
        WHERE l.user_id = ?
        ORDER BY t.created_at ASC, t.rowid ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(tracks::from_row).collect())
}
