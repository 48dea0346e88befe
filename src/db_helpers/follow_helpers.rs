use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;

pub async fn is_following(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, RequestError> {
    let mut tx = pool.begin().await?;
    let exists = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(exists != 0)
}

/// Creates the follow edge. A repeat follow is a no-op (the schema declares
/// no uniqueness on the pair, so the existence check runs inside the same
/// transaction). The `follower_id <> followed_id` CHECK constraint is the
/// storage-layer backstop against self-follows.
pub async fn follow(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let existing = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT id FROM follows WHERE follower_id = $1 AND followed_id = $2",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_optional(&mut tx)
    .await?;
    if existing.is_none() {
        sqlx::query("INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
