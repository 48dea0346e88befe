use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Comment};

const COMMENT_SELECT: &str = r#"
    SELECT comments.id        AS "id",
           comments.text      AS "text",
           comments.created   AS "created",
           comments.post_id   AS "post_id",
           comments.author_id AS "author_id",
           users.username     AS "author_username"
      FROM comments
           JOIN users
             ON users.id = comments.author_id
"#;

pub async fn insert_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> Result<Comment, RequestError> {
    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO comments (text, post_id, author_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(text)
    .bind(post_id)
    .bind(author_id)
    .fetch_one(&mut tx)
    .await?;

    let query = format!("{} WHERE comments.id = $1", COMMENT_SELECT);
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn list_post_comments(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{} WHERE comments.post_id = $1 ORDER BY comments.created DESC, comments.id DESC",
        COMMENT_SELECT
    );
    let comments = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(post_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comments)
}
