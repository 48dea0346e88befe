use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Group};

pub async fn get_group_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<Group>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query_as::<Sqlite, Group>(
        "SELECT id, title, slug, description FROM groups WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

/// Groups have no public creation route; they are provisioned out-of-band by
/// operators (and by tests).
pub async fn insert_group(
    pool: &SqlitePool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, RequestError> {
    let mut tx = pool.begin().await?;
    let group = sqlx::query_as::<Sqlite, Group>(
        r#"
        INSERT INTO groups (title, slug, description)
        VALUES ($1, $2, $3)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(group)
}
