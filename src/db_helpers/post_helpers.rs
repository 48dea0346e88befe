use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Post};

const POST_SELECT: &str = r#"
    SELECT posts.id           AS "id",
           posts.text         AS "text",
           posts.pub_date     AS "pub_date",
           posts.image        AS "image",
           posts.author_id    AS "author_id",
           users.username     AS "author_username",
           posts.group_id     AS "group_id",
           groups.slug        AS "group_slug",
           groups.title       AS "group_title"
      FROM posts
           JOIN users
             ON users.id = posts.author_id
           LEFT JOIN groups
             ON groups.id = posts.group_id
"#;

// pub_date has second resolution, so id breaks ties to keep the ordering
// monotonic with insertion order.
const POST_ORDER: &str = " ORDER BY posts.pub_date DESC, posts.id DESC";

pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{}{}", POST_SELECT, POST_ORDER);
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

pub async fn list_group_posts(pool: &SqlitePool, group_id: i64) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{} WHERE posts.group_id = $1{}", POST_SELECT, POST_ORDER);
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(group_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

pub async fn list_author_posts(
    pool: &SqlitePool,
    author_id: i64,
) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{} WHERE posts.author_id = $1{}", POST_SELECT, POST_ORDER);
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(author_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

/// Posts authored by anyone the given user follows, newest first.
pub async fn list_feed_posts(pool: &SqlitePool, user_id: i64) -> Result<Vec<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{} WHERE posts.author_id IN (SELECT followed_id FROM follows WHERE follower_id = $1){}",
        POST_SELECT, POST_ORDER
    );
    let posts = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(user_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(posts)
}

pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!("{} WHERE posts.id = $1", POST_SELECT);
    let post = sqlx::query_as::<Sqlite, Post>(&query)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(post)
}

pub async fn insert_post(
    pool: &SqlitePool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    image: Option<&str>,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO posts (text, author_id, group_id, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(text)
    .bind(author_id)
    .bind(group_id)
    .bind(image)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;

    let post = get_post(pool, id).await?.ok_or(RequestError::ServerError)?;
    Ok(post)
}

/// Only `text` and `group` are editable; `pub_date`, `author` and `image`
/// stay as created.
pub async fn update_post(
    pool: &SqlitePool,
    id: i64,
    text: &str,
    group_id: Option<i64>,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE posts SET text = $1, group_id = $2 WHERE id = $3")
        .bind(text)
        .bind(group_id)
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
