use sqlx::{Sqlite, SqlitePool};

use crate::{data_formats::SignupRequest, errors::RequestError, models::User};

const USER_SELECT: &str = r#"
    SELECT id, username, email, password, first_name, last_name, created_at
      FROM users
"#;

/// Inserts a new account. `request.password` must already be hashed.
pub async fn insert_user(pool: &SqlitePool, request: &SignupRequest) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<Sqlite, User>(
        r#"
        INSERT INTO users (username, email, password, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, email, password, first_name, last_name, created_at
        "#,
    )
    .bind(&request.username)
    .bind(&request.email)
    .bind(&request.password)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(user)
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, User>(&format!("{} WHERE username = $1", USER_SELECT))
        .bind(username)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, User>(&format!("{} WHERE id = $1", USER_SELECT))
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
