use crate::time::{from_millis, like_pattern, now_millis};
use hepzify_core::{
    error::{HepzifyError, Result},
    types::{CreateTrack, Track, TrackId, UserId},
};
use sqlx::{sqlite::SqliteRow, Row, SqliteExecutor, SqlitePool};

/// Track columns plus the like-set folded into one comma separated column
const SELECT_TRACK: &str = r#"
    SELECT t.id, t.title, t.artist, t.genre, t.audio_url, t.image_url,
           t.duration_ms, t.created_at, t.updated_at,
           (SELECT GROUP_CONCAT(l.user_id, ',') FROM track_likes l WHERE l.track_id = t.id) AS likes
    FROM tracks t
"#;

pub(crate) fn from_row(row: &SqliteRow) -> Track {
    let likes: Option<String> = row.get("likes");
    Track {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        genre: row.get("genre"),
        audio_url: row.get("audio_url"),
        image_url: row.get("image_url"),
        duration_ms: row
            .get::<Option<i64>, _>("duration_ms")
            .and_then(|ms| u64::try_from(ms).ok()),
        likes: likes
            .map(|s| s.split(',').filter(|id| !id.is_empty()).map(UserId::new).collect())
            .unwrap_or_default(),
        created_at: from_millis(row.get("created_at")),
        updated_at: from_millis(row.get("updated_at")),
    }
}

/// Get all tracks in the order they were added
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let sql = format!("{SELECT_TRACK} ORDER BY t.created_at ASC, t.rowid ASC");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows.iter().map(from_row).collect())
}

/// Get track by ID
pub async fn get_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &TrackId,
) -> Result<Option<Track>> {
    let sql = format!("{SELECT_TRACK} WHERE t.id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    Ok(row.as_ref().map(from_row))
}

/// First track whose title contains `title`, case-insensitive
pub async fn find_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Track>> {
    let sql = format!(
        "{SELECT_TRACK} WHERE t.title LIKE ? ESCAPE '\\' \
         ORDER BY t.created_at ASC, t.rowid ASC LIMIT 1"
    );
    let row = sqlx::query(&sql)
        .bind(like_pattern(title))
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(from_row))
}

/// Search title, artist and genre, case-insensitive
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Track>> {
    let sql = format!(
        "{SELECT_TRACK} \
         WHERE t.title LIKE ?1 ESCAPE '\\' \
            OR t.artist LIKE ?1 ESCAPE '\\' \
            OR t.genre LIKE ?1 ESCAPE '\\' \
         ORDER BY t.created_at ASC, t.rowid ASC"
    );
    let rows = sqlx::query(&sql)
        .bind(like_pattern(query))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(from_row).collect())
}

/// Create new track
pub async fn create(pool: &SqlitePool, input: CreateTrack) -> Result<Track> {
    input.validate()?;

    let id = TrackId::generate();
    let now = now_millis();
    let duration_ms = input.duration_ms.and_then(|ms| i64::try_from(ms).ok());

    sqlx::query(
        r#"
        INSERT INTO tracks (id, title, artist, genre, audio_url, image_url, duration_ms, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(input.title.trim())
    .bind(input.artist.trim())
    .bind(input.genre.trim())
    .bind(&input.audio_url)
    .bind(input.image_url.unwrap_or_default())
    .bind(duration_ms)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::debug!(track_id = %id, "track created");

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| HepzifyError::not_found("Track", id.as_str()))
}

/// Delete track. Likes, comments and playlist entries cascade.
pub async fn delete(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    // Keep playlist positions dense for every playlist that loses this track
    let entries = sqlx::query("SELECT playlist_id, position FROM playlist_tracks WHERE track_id = ?")
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HepzifyError::not_found("Track", id.as_str()));
    }

    for entry in entries {
        let playlist_id: String = entry.get("playlist_id");
        let position: i64 = entry.get("position");
        sqlx::query(
            "UPDATE playlist_tracks SET position = position - 1 WHERE playlist_id = ? AND position > ?",
        )
        .bind(playlist_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(track_id = %id, "track deleted");
    Ok(())
}
