use crate::time::{from_millis, is_unique_violation, now_millis};
use hepzify_core::{
    error::{HepzifyError, Result},
    types::{User, UserCredentials, UserId},
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        created_at: from_millis(row.get("created_at")),
    }
}

/// Create a user. Emails are unique, ignoring case.
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User> {
    let id = UserId::generate();
    let now = now_millis();

    sqlx::query("INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                HepzifyError::duplicate("User already exists")
            } else {
                e.into()
            }
        })?;

    Ok(User {
        id,
        email: email.to_string(),
        name: name.to_string(),
        created_at: from_millis(now),
    })
}

/// Look up a user and their password hash by email
pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        "SELECT id, email, name, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserCredentials {
        user: user_from_row(&row),
        password_hash: row.get("password_hash"),
    }))
}

pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, name, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(user_from_row))
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, email, name, created_at FROM users ORDER BY created_at, rowid")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(user_from_row).collect())
}
