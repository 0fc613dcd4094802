use crate::time::{from_millis, now_millis};
use hepzify_core::{
    error::{HepzifyError, Result},
    types::{Comment, CommentId, TrackId, UserId},
};
use sqlx::{Row, SqlitePool};

/// Add a comment to a track
pub async fn add(
    pool: &SqlitePool,
    track_id: &TrackId,
    user_id: &UserId,
    text: &str,
) -> Result<Comment> {
    let text = text.trim();
    if text.is_empty() {
        return Err(HepzifyError::invalid_input("Comment text is required"));
    }

    let author: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    let author_name = author.ok_or_else(|| HepzifyError::not_found("User", user_id.as_str()))?;

    let track_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tracks WHERE id = ?")
        .bind(track_id)
        .fetch_optional(pool)
        .await?;
    if track_exists.is_none() {
        return Err(HepzifyError::not_found("Track", track_id.as_str()));
    }

    let id = CommentId::generate();
    let now = now_millis();
    sqlx::query("INSERT INTO comments (id, track_id, user_id, text, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(track_id)
        .bind(user_id)
        .bind(text)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(Comment {
        id,
        track_id: track_id.clone(),
        user_id: user_id.clone(),
        author_name,
        text: text.to_string(),
        created_at: from_millis(now),
    })
}

/// Comments on a track, oldest first
pub async fn for_track(pool: &SqlitePool, track_id: &TrackId) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.track_id, c.user_id, u.name AS author_name, c.text, c.created_at
        FROM comments c
        INNER JOIN users u ON u.id = c.user_id
        WHERE c.track_id = ?
        ORDER BY c.created_at ASC, c.rowid ASC
        "#,
    )
    .bind(track_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Comment {
            id: row.get("id"),
            track_id: row.get("track_id"),
            user_id: row.get("user_id"),
            author_name: row.get("author_name"),
            text: row.get("text"),
            created_at: from_millis(row.get("created_at")),
        })
        .collect())
}
